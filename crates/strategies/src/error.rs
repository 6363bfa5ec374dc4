// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough price data to calculate SMA: need {required} samples, have {available}")]
    InsufficientPriceData { required: u64, available: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
