// In crates/authorization/src/admin.rs

use crate::{Authorizer, Error, Result};
use core_types::{BotState, Operation, Principal};

/// Single-principal policy: privileged operations are reserved for the
/// record's admin, price-driven operations are open to anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdminAuthorizer;

impl Authorizer for AdminAuthorizer {
    fn name(&self) -> &'static str {
        "AdminAuthorizer"
    }

    fn authorize(&self, state: &BotState, caller: &Principal, operation: Operation) -> Result<()> {
        if !operation.requires_admin() || caller == state.admin() {
            return Ok(());
        }

        tracing::warn!(
            %caller,
            admin = %state.admin(),
            %operation,
            "Rejected operation from non-admin caller."
        );
        Err(Error::Unauthorized {
            caller: caller.clone(),
            operation,
        })
    }
}
