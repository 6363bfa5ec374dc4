// In crates/strategies/src/ma_crossover.rs

use crate::{Result, Strategy, crossover, sma};
use core_types::{BotState, Signal};

/// Classic two-window simple moving average crossover.
///
/// The window lengths live in the bot record, so a single instance can
/// serve any number of bots.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmaCrossover;

impl Strategy for SmaCrossover {
    fn name(&self) -> &'static str {
        "SmaCrossover"
    }

    fn ingest(&self, state: &mut BotState, price: u64) -> Result<()> {
        sma::ingest(state, price)
    }

    fn evaluate(&self, state: &mut BotState) -> Signal {
        crossover::detect(state)
    }
}
