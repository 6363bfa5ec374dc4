// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The window lengths break `0 < short < long <= Periods::MAX_LONG`.
    /// A zero short window, a long window not above the short one and a
    /// long window over 10 000 samples are all rejected.
    #[error("Invalid SMA periods: short={short}, long={long} (need 0 < short < long <= {max})", max = crate::types::Periods::MAX_LONG)]
    InvalidConfiguration { short: u64, long: u64 },

    #[error("Invalid bot state snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
