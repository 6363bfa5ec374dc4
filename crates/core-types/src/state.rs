// In crates/core-types/src/state.rs

use crate::{Error, Periods, PriceHistory, Principal, Result, Signal};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// The durable record of one deployed bot.
///
/// A `BotState` exclusively owns its price history and moving averages.
/// Fields are private; every mutation goes through one of the transition
/// methods below so that the window invariants cannot be broken from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BotStateRecord")]
pub struct BotState {
    admin: Principal,
    periods: Periods,
    history: PriceHistory,
    short_sma: Option<u64>,
    long_sma: Option<u64>,
    prev_short_sma: Option<u64>,
    prev_long_sma: Option<u64>,
    last_price: Option<u64>,
    last_signal: Signal,
    /// Number of SMA pairs computed since the windows were last configured.
    sma_sequence: u64,
    /// The `sma_sequence` last consumed by crossover detection.
    evaluated_sequence: Option<u64>,
    trades_executed: u64,
}

/// Unvalidated mirror of `BotState`, used when loading a snapshot.
#[derive(Deserialize)]
struct BotStateRecord {
    admin: Principal,
    periods: Periods,
    history: PriceHistory,
    short_sma: Option<u64>,
    long_sma: Option<u64>,
    prev_short_sma: Option<u64>,
    prev_long_sma: Option<u64>,
    last_price: Option<u64>,
    #[serde(default)]
    last_signal: Signal,
    #[serde(default)]
    sma_sequence: u64,
    #[serde(default)]
    evaluated_sequence: Option<u64>,
    #[serde(default)]
    trades_executed: u64,
}

impl TryFrom<BotStateRecord> for BotState {
    type Error = Error;

    fn try_from(record: BotStateRecord) -> Result<Self> {
        if record.history.capacity() as u64 != record.periods.long() {
            return Err(Error::InvalidSnapshot(format!(
                "history capacity {} does not match long period {}",
                record.history.capacity(),
                record.periods.long()
            )));
        }
        if record.short_sma.is_some() != record.long_sma.is_some()
            || record.prev_short_sma.is_some() != record.prev_long_sma.is_some()
        {
            return Err(Error::InvalidSnapshot(
                "SMA values must be present in pairs".to_string(),
            ));
        }
        let has_pair = record.short_sma.is_some();
        if has_pair && (record.sma_sequence == 0 || (record.history.len() as u64) < record.periods.long()) {
            return Err(Error::InvalidSnapshot(format!(
                "SMA pair present with {} of {} samples at sequence {}",
                record.history.len(),
                record.periods.long(),
                record.sma_sequence
            )));
        }
        if !has_pair && record.sma_sequence > 0 {
            return Err(Error::InvalidSnapshot(
                "SMA sequence advanced without an SMA pair".to_string(),
            ));
        }
        if record.prev_short_sma.is_some() && (!has_pair || record.sma_sequence < 2) {
            return Err(Error::InvalidSnapshot(
                "previous SMA pair present without a current one".to_string(),
            ));
        }
        if record.evaluated_sequence.is_some_and(|seq| seq > record.sma_sequence) {
            return Err(Error::InvalidSnapshot(
                "evaluated sequence is ahead of the SMA sequence".to_string(),
            ));
        }

        Ok(Self {
            admin: record.admin,
            periods: record.periods,
            history: record.history,
            short_sma: record.short_sma,
            long_sma: record.long_sma,
            prev_short_sma: record.prev_short_sma,
            prev_long_sma: record.prev_long_sma,
            last_price: record.last_price,
            last_signal: record.last_signal,
            sma_sequence: record.sma_sequence,
            evaluated_sequence: record.evaluated_sequence,
            trades_executed: record.trades_executed,
        })
    }
}

fn history_for(periods: Periods) -> PriceHistory {
    // `Periods` guarantees 0 < long <= MAX_LONG, so this never falls back.
    let capacity = usize::try_from(periods.long())
        .ok()
        .and_then(NonZeroUsize::new)
        .unwrap_or(NonZeroUsize::MIN);
    PriceHistory::new(capacity)
}

impl BotState {
    /// Creates a fresh record owned by `admin`.
    pub fn new(admin: Principal, periods: Periods) -> Self {
        Self {
            admin,
            periods,
            history: history_for(periods),
            short_sma: None,
            long_sma: None,
            prev_short_sma: None,
            prev_long_sma: None,
            last_price: None,
            last_signal: Signal::None,
            sma_sequence: 0,
            evaluated_sequence: None,
            trades_executed: 0,
        }
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    pub fn periods(&self) -> Periods {
        self.periods
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn short_sma(&self) -> Option<u64> {
        self.short_sma
    }

    pub fn long_sma(&self) -> Option<u64> {
        self.long_sma
    }

    /// The current `(short, long)` pair, once both are defined.
    pub fn sma_pair(&self) -> Option<(u64, u64)> {
        self.short_sma.zip(self.long_sma)
    }

    /// The previous `(short, long)` pair, once both are defined.
    pub fn prev_sma_pair(&self) -> Option<(u64, u64)> {
        self.prev_short_sma.zip(self.prev_long_sma)
    }

    pub fn last_price(&self) -> Option<u64> {
        self.last_price
    }

    pub fn last_signal(&self) -> Signal {
        self.last_signal
    }

    pub fn sma_sequence(&self) -> u64 {
        self.sma_sequence
    }

    pub fn evaluated_sequence(&self) -> Option<u64> {
        self.evaluated_sequence
    }

    /// Whether the current SMA pair has already been through crossover detection.
    pub fn is_current_pair_evaluated(&self) -> bool {
        self.evaluated_sequence == Some(self.sma_sequence)
    }

    pub fn trades_executed(&self) -> u64 {
        self.trades_executed
    }

    // --- Transitions ---

    /// Appends a sample to the history and makes it the last price.
    /// Returns the evicted sample, if any.
    pub fn record_price(&mut self, price: u64) -> Option<u64> {
        self.last_price = Some(price);
        self.history.push(price)
    }

    /// Moves the current pair into the previous slot and stores a new one.
    pub fn commit_sma(&mut self, short_sma: u64, long_sma: u64) {
        self.prev_short_sma = self.short_sma;
        self.prev_long_sma = self.long_sma;
        self.short_sma = Some(short_sma);
        self.long_sma = Some(long_sma);
        self.sma_sequence += 1;
    }

    /// Marks the current SMA pair as consumed by crossover detection.
    pub fn mark_evaluated(&mut self) {
        self.evaluated_sequence = Some(self.sma_sequence);
    }

    pub fn set_last_signal(&mut self, signal: Signal) {
        self.last_signal = signal;
    }

    /// Installs new windows. Accumulated history and every derived average
    /// belong to the old windows, so they are discarded.
    pub fn reconfigure(&mut self, periods: Periods) {
        self.periods = periods;
        self.history = history_for(periods);
        self.short_sma = None;
        self.long_sma = None;
        self.prev_short_sma = None;
        self.prev_long_sma = None;
        self.sma_sequence = 0;
        self.evaluated_sequence = None;
    }

    pub fn set_admin(&mut self, admin: Principal) {
        self.admin = admin;
    }

    /// Counts a completed trade and returns the new total.
    pub fn record_trade(&mut self) -> u64 {
        self.trades_executed += 1;
        self.trades_executed
    }
}
