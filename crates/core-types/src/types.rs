// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity able to sign operations against a bot (a wallet key in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A balance account owned by the external transfer mechanism.
/// Bots only ever refer to these by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Handle addressing one bot record inside an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub u64);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot-{}", self.0)
    }
}

/// The directional output of crossover detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// No pending directive.
    #[default]
    None,
    /// The short average has just risen above the long average.
    Buy,
    /// The short average has just fallen below the long average.
    Sell,
}

impl Signal {
    /// True for `Buy` and `Sell`.
    pub fn is_actionable(self) -> bool {
        !matches!(self, Signal::None)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::None => "none",
            Signal::Buy => "buy",
            Signal::Sell => "sell",
        };
        f.write_str(s)
    }
}

/// Window lengths, in price samples, of the short and long averages.
///
/// Always satisfies `0 < short < long <= Periods::MAX_LONG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriods")]
pub struct Periods {
    short: u64,
    long: u64,
}

#[derive(Deserialize)]
struct RawPeriods {
    short: u64,
    long: u64,
}

impl TryFrom<RawPeriods> for Periods {
    type Error = Error;

    fn try_from(raw: RawPeriods) -> Result<Self> {
        Periods::new(raw.short, raw.long)
    }
}

impl Periods {
    /// Upper bound on the long window. The price history is allocated up
    /// front with this many slots at most.
    pub const MAX_LONG: u64 = 10_000;

    pub fn new(short: u64, long: u64) -> Result<Self> {
        if short == 0 || long <= short || long > Self::MAX_LONG {
            return Err(Error::InvalidConfiguration { short, long });
        }
        Ok(Self { short, long })
    }

    pub fn short(&self) -> u64 {
        self.short
    }

    pub fn long(&self) -> u64 {
        self.long
    }
}

/// Operations that can be applied to a bot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Initialize,
    CalculateSma,
    DetectCrossover,
    UpdatePeriods,
    ExecuteTrade,
    TransferAdmin,
}

impl Operation {
    /// Whether the operation mutates configuration or moves value, and so
    /// may only be performed by the bot's admin.
    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Operation::UpdatePeriods | Operation::ExecuteTrade | Operation::TransferAdmin
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Initialize => "initialize",
            Operation::CalculateSma => "calculate_sma",
            Operation::DetectCrossover => "detect_crossover",
            Operation::UpdatePeriods => "update_periods",
            Operation::ExecuteTrade => "execute_trade",
            Operation::TransferAdmin => "transfer_admin",
        };
        f.write_str(s)
    }
}

/// Proof of a completed transfer between the two counterpart accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub signal: Signal,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u64,
    /// The last ingested price at the time of execution.
    pub price: Option<u64>,
    /// 1-based count of trades executed by the bot, including this one.
    pub sequence: u64,
    pub executed_at: DateTime<Utc>,
}
