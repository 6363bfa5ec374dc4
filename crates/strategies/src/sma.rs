// In crates/strategies/src/sma.rs

use crate::{Error, Result};
use core_types::BotState;
use tracing::debug;

/// Folds `price` into the bot's history and recomputes both averages.
///
/// The price is always recorded: it is appended to the history (evicting
/// the oldest sample once `long` samples are held) and becomes the last
/// price. The SMA pair is only recomputed once both windows are covered;
/// until then this returns `InsufficientPriceData` and the averages, their
/// previous values and the sequence markers are untouched.
pub fn ingest(state: &mut BotState, price: u64) -> Result<()> {
    state.record_price(price);

    let periods = state.periods();
    let available = state.history().len() as u64;
    for required in [periods.short(), periods.long()] {
        if available < required {
            debug!(price, required, available, "Warming up SMA windows.");
            return Err(Error::InsufficientPriceData { required, available });
        }
    }

    let short_sma = window_mean(state, periods.short())?;
    let long_sma = window_mean(state, periods.long())?;
    state.commit_sma(short_sma, long_sma);

    debug!(
        price,
        short_sma,
        long_sma,
        sequence = state.sma_sequence(),
        "SMA calculated."
    );
    Ok(())
}

fn window_mean(state: &BotState, window: u64) -> Result<u64> {
    let available = state.history().len() as u64;
    usize::try_from(window)
        .ok()
        .and_then(|w| state.history().mean_of_latest(w))
        .ok_or(Error::InsufficientPriceData {
            required: window,
            available,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Periods, Principal};
    use ta::Next;
    use ta::indicators::SimpleMovingAverage;

    fn state(short: u64, long: u64) -> BotState {
        BotState::new(Principal::from("admin"), Periods::new(short, long).unwrap())
    }

    #[test]
    fn test_fails_before_short_window_is_filled() {
        let mut s = state(3, 5);
        for (i, p) in [10, 11].into_iter().enumerate() {
            let err = ingest(&mut s, p).unwrap_err();
            assert_eq!(
                err,
                Error::InsufficientPriceData { required: 3, available: i as u64 + 1 }
            );
        }
        assert_eq!(s.sma_pair(), None);
        assert_eq!(s.last_price(), Some(11));
        assert_eq!(s.history().to_vec(), vec![10, 11]);
    }

    #[test]
    fn test_fails_until_long_window_is_filled() {
        let mut s = state(2, 4);
        assert_eq!(
            ingest(&mut s, 1),
            Err(Error::InsufficientPriceData { required: 2, available: 1 })
        );
        // The short window is covered from here on, but the pair is only
        // committed together.
        for (p, available) in [(2, 2), (3, 3)] {
            assert_eq!(
                ingest(&mut s, p),
                Err(Error::InsufficientPriceData { required: 4, available })
            );
        }
        assert_eq!(s.sma_pair(), None);
        assert_eq!(s.sma_sequence(), 0);

        ingest(&mut s, 4).unwrap();
        assert_eq!(s.sma_pair(), Some((3, 2))); // (3+4)/2, (1+2+3+4)/4
        assert_eq!(s.prev_sma_pair(), None);
    }

    #[test]
    fn test_identical_prices_give_equal_averages() {
        let mut s = state(5, 20);
        for _ in 0..20 {
            let _ = ingest(&mut s, 100);
        }
        assert_eq!(s.short_sma(), Some(100));
        assert_eq!(s.long_sma(), Some(100));
    }

    #[test]
    fn test_previous_pair_is_snapshot_before_overwrite() {
        let mut s = state(1, 2);
        let _ = ingest(&mut s, 10);
        ingest(&mut s, 20).unwrap();
        ingest(&mut s, 40).unwrap();
        assert_eq!(s.prev_sma_pair(), Some((20, 15)));
        assert_eq!(s.sma_pair(), Some((40, 30)));
        assert_eq!(s.history().to_vec(), vec![20, 40]);
    }

    #[test]
    fn test_matches_direct_recomputation() {
        let prices: Vec<u64> = (0..60u64).map(|i| 1_000 + (i * 37) % 101).collect();
        let (short, long) = (7u64, 15u64);
        let mut s = state(short, long);

        for (i, &p) in prices.iter().enumerate() {
            let result = ingest(&mut s, p);
            if i + 1 < long as usize {
                assert!(result.is_err());
                continue;
            }
            result.unwrap();
            let seen = &prices[..=i];
            let mean = |w: u64| -> u64 {
                let tail = &seen[seen.len() - w as usize..];
                tail.iter().sum::<u64>() / w
            };
            assert_eq!(s.short_sma(), Some(mean(short)));
            assert_eq!(s.long_sma(), Some(mean(long)));
        }
    }

    #[test]
    fn test_agrees_with_reference_indicator_on_whole_means() {
        // Multiples of the window keep every mean integral, so the float
        // reference and the integer average must agree exactly.
        let prices: Vec<u64> = [4u64, 8, 12, 16, 20, 16, 12, 8, 4, 8, 12, 16]
            .iter()
            .map(|p| p * 3)
            .collect();
        let mut s = state(2, 4);
        let mut reference = SimpleMovingAverage::new(4).unwrap();

        for (i, &p) in prices.iter().enumerate() {
            let expected = reference.next(p as f64);
            if ingest(&mut s, p).is_ok() {
                assert!(i >= 3);
                let sum: u64 = prices[i - 3..=i].iter().sum();
                if sum % 4 == 0 {
                    assert_eq!(s.long_sma(), Some(expected as u64));
                }
            }
        }
    }
}
