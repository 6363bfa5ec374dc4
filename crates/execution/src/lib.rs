// In crates/execution/src/lib.rs

use core_types::{BotState, Signal, TradeReceipt};

pub mod error;
pub mod ledger;
pub mod transfer;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use ledger::{InMemoryLedger, Ledger};
pub use transfer::TransferExecutor;
pub use types::{Counterparties, ExecutionSettings, SignalPolicy};

/// The universal interface for a trade executor.
///
/// An `Executor` turns the bot's pending signal into a value transfer on a
/// `Ledger`. It does not check who is calling; that is the authorizer's job
/// and must happen first.
pub trait Executor {
    /// The name of the executor.
    fn name(&self) -> &'static str;

    /// Executes `signal` against the bot record.
    ///
    /// # Returns
    ///
    /// A `TradeReceipt` on success. On error neither the ledger nor the
    /// bot record has changed.
    fn execute(
        &self,
        state: &mut BotState,
        signal: Signal,
        ledger: &mut dyn Ledger,
    ) -> Result<TradeReceipt>;
}
