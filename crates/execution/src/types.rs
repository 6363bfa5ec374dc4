// In crates/execution/src/types.rs

use crate::{Error, Result};
use core_types::AccountId;
use serde::{Deserialize, Serialize};

/// What happens to the bot's pending signal after a successful trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalPolicy {
    /// Leave `last_signal` in place; the same signal can be executed again.
    #[default]
    Retain,
    /// Reset `last_signal` to `None`, so each signal trades at most once.
    Consume,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionSettings {
    /// Units moved per trade.
    #[serde(default = "default_trade_amount")]
    pub trade_amount: u64,

    #[serde(default)]
    pub signal_policy: SignalPolicy,

    /// The account that pays on a buy and receives on a sell.
    pub user_account: AccountId,

    /// The bot's counterpart account.
    pub bot_account: AccountId,
}

fn default_trade_amount() -> u64 {
    1
}

/// The two accounts a bot trades between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterparties {
    user_account: AccountId,
    bot_account: AccountId,
}

impl Counterparties {
    pub fn new(user_account: AccountId, bot_account: AccountId) -> Result<Self> {
        if user_account == bot_account {
            return Err(Error::InvalidSettings {
                reason: format!("user and bot account are both {user_account}"),
            });
        }
        Ok(Self {
            user_account,
            bot_account,
        })
    }

    pub fn user_account(&self) -> &AccountId {
        &self.user_account
    }

    pub fn bot_account(&self) -> &AccountId {
        &self.bot_account
    }
}
