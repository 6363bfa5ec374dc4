// In crates/engine/src/lib.rs

pub mod bot;
pub mod error;

use crate::bot::Bot;
use core_types::{BotId, BotState, Periods, Principal, Signal, TradeReceipt};
use events::BotEvent;
use execution::{ExecutionSettings, Ledger, TransferExecutor};
use std::collections::BTreeMap;
use tokio::sync::broadcast;

pub use error::{Error, Result};

pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Registry of bot records, addressed by `BotId` handles.
///
/// Bots never share mutable state; the engine only routes each call to the
/// addressed record. Operations take `&mut self`, so callers sharing an
/// engine across tasks must serialize access (e.g. behind a mutex).
pub struct Engine {
    bots: BTreeMap<BotId, Bot>,
    next_id: u64,
    execution: ExecutionSettings,
    events: broadcast::Sender<BotEvent>,
}

impl Engine {
    /// Creates an empty engine. Every bot it creates trades with `execution`.
    pub fn new(execution: ExecutionSettings) -> Result<Self> {
        // Fail on bad settings now rather than on the first initialize.
        TransferExecutor::new(&execution)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            bots: BTreeMap::new(),
            next_id: 1,
            execution,
            events,
        })
    }

    /// A receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BotEvent> {
        self.events.subscribe()
    }

    /// Creates a bot record owned by `caller`.
    pub fn initialize(&mut self, short_period: u64, long_period: u64, caller: Principal) -> Result<BotId> {
        let periods = Periods::new(short_period, long_period)?;
        let executor = TransferExecutor::new(&self.execution)?;
        let id = self.allocate_id();
        let bot = Bot::initialize(id, periods, caller, Box::new(executor), self.events.clone());
        self.bots.insert(id, bot);
        Ok(id)
    }

    /// Registers an existing record under a new handle.
    pub fn restore(&mut self, state: BotState) -> Result<BotId> {
        let executor = TransferExecutor::new(&self.execution)?;
        let id = self.allocate_id();
        tracing::info!(bot = %id, admin = %state.admin(), "Bot restored from snapshot.");
        self.bots
            .insert(id, Bot::restore(id, state, Box::new(executor), self.events.clone()));
        Ok(id)
    }

    pub fn calculate_sma(&mut self, bot: BotId, price: u64) -> Result<()> {
        self.bot_mut(bot)?.calculate_sma(price)
    }

    pub fn detect_crossover(&mut self, bot: BotId) -> Result<Signal> {
        Ok(self.bot_mut(bot)?.detect_crossover())
    }

    /// Feeds one price through the SMA and crossover stages.
    pub fn tick(&mut self, bot: BotId, price: u64) -> Result<Signal> {
        Ok(self.bot_mut(bot)?.tick(price))
    }

    pub fn update_periods(
        &mut self,
        bot: BotId,
        short_period: u64,
        long_period: u64,
        caller: &Principal,
    ) -> Result<()> {
        self.bot_mut(bot)?
            .update_periods(short_period, long_period, caller)
    }

    pub fn execute_trade(
        &mut self,
        bot: BotId,
        signal: Signal,
        caller: &Principal,
        ledger: &mut dyn Ledger,
    ) -> Result<TradeReceipt> {
        self.bot_mut(bot)?.execute_trade(signal, caller, ledger)
    }

    pub fn transfer_admin(&mut self, bot: BotId, new_admin: Principal, caller: &Principal) -> Result<()> {
        self.bot_mut(bot)?.transfer_admin(new_admin, caller)
    }

    pub fn state(&self, bot: BotId) -> Result<&BotState> {
        self.bots
            .get(&bot)
            .map(Bot::state)
            .ok_or(Error::UnknownBot(bot))
    }

    /// Handles of every registered bot, in creation order.
    pub fn bots(&self) -> impl Iterator<Item = BotId> + '_ {
        self.bots.keys().copied()
    }

    fn bot_mut(&mut self, bot: BotId) -> Result<&mut Bot> {
        self.bots.get_mut(&bot).ok_or(Error::UnknownBot(bot))
    }

    fn allocate_id(&mut self) -> BotId {
        let id = BotId(self.next_id);
        self.next_id += 1;
        id
    }
}
