// In crates/authorization/src/lib.rs

use core_types::{BotState, Operation, Principal};

pub mod admin;
pub mod error;

// Re-export public types
pub use admin::AdminAuthorizer;
pub use error::{Error, Result};

/// The universal interface for an operation guard.
///
/// An `Authorizer` decides whether `caller` may apply `operation` to a bot
/// record. It only reads the record and must be consulted before any
/// mutation, so a rejected operation leaves the record exactly as it was.
pub trait Authorizer: Send + Sync {
    /// The name of the authorization policy.
    fn name(&self) -> &'static str;

    /// # Returns
    ///
    /// * `Ok(())`: the operation may proceed.
    /// * `Err(Error::Unauthorized)`: the caller lacks the required capability.
    fn authorize(&self, state: &BotState, caller: &Principal, operation: Operation) -> Result<()>;
}
