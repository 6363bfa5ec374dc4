// In crates/strategies/src/crossover.rs

use core_types::{BotState, Signal};
use tracing::{debug, info};

/// Classifies the move between two consecutive `(short, long)` SMA pairs.
///
/// A golden cross (short rises from at-or-below to strictly above long) is
/// a `Buy`, a death cross is a `Sell`. Anything else, ties included, is `None`.
pub fn classify(previous: (u64, u64), current: (u64, u64)) -> Signal {
    let (prev_short, prev_long) = previous;
    let (short, long) = current;

    if prev_short <= prev_long && short > long {
        Signal::Buy
    } else if prev_short >= prev_long && short < long {
        Signal::Sell
    } else {
        Signal::None
    }
}

/// Runs crossover detection on the bot's current and previous SMA pairs.
///
/// Returns `None` without touching `last_signal` when either pair is
/// missing or when the current pair has already been evaluated. Otherwise
/// the pair is marked evaluated and a `Buy`/`Sell` result is written to
/// `last_signal`.
pub fn detect(state: &mut BotState) -> Signal {
    let (Some(previous), Some(current)) = (state.prev_sma_pair(), state.sma_pair()) else {
        debug!("Crossover skipped: fewer than two SMA computations.");
        return Signal::None;
    };
    if state.is_current_pair_evaluated() {
        debug!(sequence = state.sma_sequence(), "Crossover skipped: SMA pair already evaluated.");
        return Signal::None;
    }

    state.mark_evaluated();
    let signal = classify(previous, current);
    if signal.is_actionable() {
        state.set_last_signal(signal);
        info!(
            %signal,
            short_sma = current.0,
            long_sma = current.1,
            price = ?state.last_price(),
            "Crossover detected."
        );
    }
    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sma::ingest;
    use core_types::{Periods, Principal};

    fn state(short: u64, long: u64) -> BotState {
        BotState::new(Principal::from("admin"), Periods::new(short, long).unwrap())
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify((10, 10), (11, 10)), Signal::Buy);
        assert_eq!(classify((9, 10), (11, 10)), Signal::Buy);
        assert_eq!(classify((10, 10), (9, 10)), Signal::Sell);
        assert_eq!(classify((11, 10), (9, 10)), Signal::Sell);
        assert_eq!(classify((11, 10), (12, 10)), Signal::None);
        assert_eq!(classify((9, 10), (8, 10)), Signal::None);
        assert_eq!(classify((10, 10), (10, 10)), Signal::None);
        assert_eq!(classify((11, 10), (10, 10)), Signal::None);
    }

    #[test]
    fn test_no_signal_without_two_pairs() {
        let mut s = state(1, 2);
        assert_eq!(detect(&mut s), Signal::None);
        let _ = ingest(&mut s, 1);
        ingest(&mut s, 5).unwrap();
        assert_eq!(detect(&mut s), Signal::None);
        assert_eq!(s.last_signal(), Signal::None);
        assert_eq!(s.evaluated_sequence(), None);
    }

    #[test]
    fn test_flat_prices_never_cross() {
        let mut s = state(5, 20);
        for _ in 0..25 {
            let _ = ingest(&mut s, 100);
            assert_eq!(detect(&mut s), Signal::None);
        }
        assert_eq!(s.last_signal(), Signal::None);
    }

    #[test]
    fn test_repeated_evaluation_of_same_pair_is_silent() {
        let mut s = state(1, 2);
        for p in [10, 10, 20] {
            let _ = ingest(&mut s, p);
        }
        assert_eq!(detect(&mut s), Signal::Buy);
        assert_eq!(detect(&mut s), Signal::None);
        assert_eq!(s.last_signal(), Signal::Buy);
    }

    #[test]
    fn test_sell_after_buy_overwrites_last_signal() {
        let mut s = state(1, 2);
        for p in [10, 10, 20] {
            let _ = ingest(&mut s, p);
        }
        assert_eq!(detect(&mut s), Signal::Buy);

        ingest(&mut s, 5).unwrap(); // (5, 12) after (20, 15)
        assert_eq!(detect(&mut s), Signal::Sell);
        assert_eq!(s.last_signal(), Signal::Sell);

        ingest(&mut s, 4).unwrap();
        assert_eq!(detect(&mut s), Signal::None);
        assert_eq!(s.last_signal(), Signal::Sell);
    }
}
