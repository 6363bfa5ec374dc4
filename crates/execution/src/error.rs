// In crates/execution/src/error.rs

use core_types::{AccountId, Signal};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No actionable signal: a trade needs a pending buy or sell")]
    NoActionableSignal,

    #[error("Requested {requested} trade does not match the pending {pending} signal")]
    SignalMismatch { requested: Signal, pending: Signal },

    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    #[error("Insufficient funds in {account}: balance {balance}, needed {required}")]
    InsufficientFunds {
        account: AccountId,
        balance: u64,
        required: u64,
    },

    #[error("Transfer of {amount} would overflow the balance of {account}")]
    BalanceOverflow { account: AccountId, amount: u64 },

    #[error("Invalid execution settings: {reason}")]
    InvalidSettings { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
