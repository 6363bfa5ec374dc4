// In crates/app-config/src/types.rs

use crate::{Error, Result};
use core_types::{AccountId, Periods, Principal};
use execution::{ExecutionSettings, InMemoryLedger};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Window lengths and ownership of the bot.
    pub bot: BotSettings,
    /// How signals are turned into transfers.
    pub execution: ExecutionSettings,
    /// Opening balances for the simulated ledger.
    #[serde(default)]
    pub ledger: LedgerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BotSettings {
    pub short_period: u64,
    pub long_period: u64,
    /// The principal that initializes the bot and becomes its admin.
    pub admin: String,
}

impl BotSettings {
    pub fn periods(&self) -> Result<Periods> {
        Periods::new(self.short_period, self.long_period).map_err(|e| Error::Invalid(e.to_string()))
    }

    pub fn admin(&self) -> Principal {
        Principal::new(self.admin.clone())
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LedgerSettings {
    #[serde(default)]
    pub balances: BTreeMap<String, u64>,
}

impl LedgerSettings {
    /// Builds the in-memory ledger seeded with the configured balances.
    pub fn build(&self) -> InMemoryLedger {
        self.balances
            .iter()
            .map(|(account, balance)| (AccountId::new(account.clone()), *balance))
            .collect()
    }
}

impl Settings {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.bot.periods()?;
        if self.bot.admin.trim().is_empty() {
            return Err(Error::Invalid("bot.admin must not be empty".to_string()));
        }
        execution::TransferExecutor::new(&self.execution)
            .map_err(|e| Error::Invalid(e.to_string()))?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
