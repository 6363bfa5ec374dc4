// In crates/authorization/src/error.rs

use core_types::{Operation, Principal};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unauthorized action: {caller} may not perform {operation}")]
    Unauthorized { caller: Principal, operation: Operation },
}

pub type Result<T> = std::result::Result<T, Error>;
