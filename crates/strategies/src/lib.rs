// In crates/strategies/src/lib.rs

use core_types::{BotState, Signal};

pub mod crossover;
pub mod error;
pub mod ma_crossover;
pub mod sma;

pub use error::{Error, Result};
pub use ma_crossover::SmaCrossover;

/// The universal interface for a signal-generating strategy.
///
/// A strategy works in two steps against a bot record it does not own:
/// `ingest` folds a new price into the record's indicators, and `evaluate`
/// turns the indicators into a `Signal`. Both steps are synchronous
/// transitions; all state lives in the `BotState`.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn ingest(&self, state: &mut BotState, price: u64) -> Result<()>;

    fn evaluate(&self, state: &mut BotState) -> Signal;
}
