// In crates/core-types/src/lib.rs

pub mod error;
pub mod history;
pub mod state;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use history::PriceHistory;
pub use state::BotState;
pub use types::{AccountId, BotId, Operation, Periods, Principal, Signal, TradeReceipt};
