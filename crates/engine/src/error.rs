// In crates/engine/src/error.rs

use core_types::BotId;
use thiserror::Error;

/// Every way an engine operation can fail. A failed operation never leaves
/// a partially mutated bot record behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected window lengths. Always holds `core_types::Error::InvalidConfiguration`.
    #[error(transparent)]
    InvalidConfiguration(core_types::Error),

    /// A bot record that fails validation. Always holds `core_types::Error::InvalidSnapshot`.
    #[error(transparent)]
    InvalidSnapshot(core_types::Error),

    #[error(transparent)]
    InsufficientPriceData(#[from] strategies::Error),

    #[error(transparent)]
    Unauthorized(#[from] authorization::Error),

    #[error("Trade failed: {0}")]
    Trade(#[from] execution::Error),

    #[error("No bot registered under {0}")]
    UnknownBot(BotId),
}

impl From<core_types::Error> for Error {
    fn from(e: core_types::Error) -> Self {
        match e {
            core_types::Error::InvalidConfiguration { .. } => Error::InvalidConfiguration(e),
            core_types::Error::InvalidSnapshot(_) => Error::InvalidSnapshot(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
