// --- Bot lifecycle events, published on every state transition ---

use chrono::{DateTime, Utc};
use core_types::{BotId, Principal, Signal, TradeReceipt};
use serde::{Deserialize, Serialize};

/// One published event: which bot, when, and what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotEvent {
    pub bot: BotId,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl BotEvent {
    pub fn now(bot: BotId, kind: EventKind) -> Self {
        Self {
            bot,
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// `tag` and `content` are used by serde for clean JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EventKind {
    Initialized {
        admin: Principal,
        short_period: u64,
        long_period: u64,
    },
    SmaCalculated {
        short_sma: u64,
        long_sma: u64,
        price: u64,
    },
    SignalDetected {
        signal: Signal,
        short_sma: u64,
        long_sma: u64,
        price: Option<u64>,
    },
    TradeExecuted(TradeReceipt),
    PeriodsUpdated {
        admin: Principal,
        short_period: u64,
        long_period: u64,
    },
    AdminTransferred {
        previous: Principal,
        admin: Principal,
    },
}
