// In crates/execution/src/ledger.rs

use crate::{Error, Result};
use core_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The external value-transfer mechanism.
///
/// Implementations must be atomic: `transfer` either moves the full amount
/// or leaves both balances untouched.
pub trait Ledger {
    fn balance(&self, account: &AccountId) -> Option<u64>;

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()>;
}

/// A ledger held in memory, used for simulation and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryLedger {
    balances: BTreeMap<AccountId, u64>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an account, or resets an existing one, with `balance`.
    pub fn open(&mut self, account: AccountId, balance: u64) {
        self.balances.insert(account, balance);
    }

    pub fn balances(&self) -> &BTreeMap<AccountId, u64> {
        &self.balances
    }
}

impl FromIterator<(AccountId, u64)> for InMemoryLedger {
    fn from_iter<I: IntoIterator<Item = (AccountId, u64)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, account: &AccountId) -> Option<u64> {
        self.balances.get(account).copied()
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()> {
        // --- Validate everything before touching a balance ---
        let from_balance = self
            .balance(from)
            .ok_or_else(|| Error::UnknownAccount(from.clone()))?;
        let to_balance = self
            .balance(to)
            .ok_or_else(|| Error::UnknownAccount(to.clone()))?;

        if from_balance < amount {
            return Err(Error::InsufficientFunds {
                account: from.clone(),
                balance: from_balance,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let new_to_balance = to_balance
            .checked_add(amount)
            .ok_or_else(|| Error::BalanceOverflow {
                account: to.clone(),
                amount,
            })?;

        // --- Commit ---
        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), new_to_balance);
        Ok(())
    }
}
