// In crates/engine/src/bot.rs

use crate::Result;
use authorization::{AdminAuthorizer, Authorizer};
use core_types::{BotId, BotState, Operation, Periods, Principal, Signal, TradeReceipt};
use events::{BotEvent, EventKind};
use execution::{Executor, Ledger};
use strategies::{SmaCrossover, Strategy};
use tokio::sync::broadcast;

/// A single bot record together with the components that drive it.
///
/// Each operation is one synchronous transition. Failed operations leave
/// the record as it was, with one exception: `calculate_sma` always keeps
/// the ingested sample, even while the windows are still warming up.
pub struct Bot {
    id: BotId,
    state: BotState,
    strategy: Box<dyn Strategy + Send + Sync>,
    authorizer: Box<dyn Authorizer>,
    executor: Box<dyn Executor + Send + Sync>,
    events: broadcast::Sender<BotEvent>,
}

impl Bot {
    /// Creates a fresh record; `caller` becomes its admin.
    pub fn initialize(
        id: BotId,
        periods: Periods,
        caller: Principal,
        executor: Box<dyn Executor + Send + Sync>,
        events: broadcast::Sender<BotEvent>,
    ) -> Self {
        let bot = Self::restore(id, BotState::new(caller, periods), executor, events);
        tracing::info!(
            bot = %id,
            admin = %bot.state.admin(),
            short_period = periods.short(),
            long_period = periods.long(),
            "Bot initialized."
        );
        bot.publish(EventKind::Initialized {
            admin: bot.state.admin().clone(),
            short_period: periods.short(),
            long_period: periods.long(),
        });
        bot
    }

    /// Wraps an existing record, e.g. one loaded from a snapshot.
    pub fn restore(
        id: BotId,
        state: BotState,
        executor: Box<dyn Executor + Send + Sync>,
        events: broadcast::Sender<BotEvent>,
    ) -> Self {
        Self {
            id,
            state,
            strategy: Box::new(SmaCrossover),
            authorizer: Box::new(AdminAuthorizer),
            executor,
            events,
        }
    }

    pub fn state(&self) -> &BotState {
        &self.state
    }

    /// Ingests a price and recomputes the averages.
    pub fn calculate_sma(&mut self, price: u64) -> Result<()> {
        self.strategy.ingest(&mut self.state, price)?;
        if let Some((short_sma, long_sma)) = self.state.sma_pair() {
            self.publish(EventKind::SmaCalculated {
                short_sma,
                long_sma,
                price,
            });
        }
        Ok(())
    }

    /// Classifies the latest SMA move and records any `Buy`/`Sell`.
    pub fn detect_crossover(&mut self) -> Signal {
        let signal = self.strategy.evaluate(&mut self.state);
        if !signal.is_actionable() {
            return signal;
        }
        if let Some((short_sma, long_sma)) = self.state.sma_pair() {
            self.publish(EventKind::SignalDetected {
                signal,
                short_sma,
                long_sma,
                price: self.state.last_price(),
            });
        }
        signal
    }

    /// `calculate_sma` followed by `detect_crossover`. Warm-up samples that
    /// cannot produce an SMA pair yet yield `Signal::None`.
    pub fn tick(&mut self, price: u64) -> Signal {
        match self.calculate_sma(price) {
            Ok(()) => self.detect_crossover(),
            Err(e) => {
                tracing::debug!(bot = %self.id, price, error = %e, "Price recorded during warm-up.");
                Signal::None
            }
        }
    }

    /// Admin-only. Installs new windows and discards the accumulated history.
    pub fn update_periods(&mut self, short: u64, long: u64, caller: &Principal) -> Result<()> {
        self.authorizer
            .authorize(&self.state, caller, Operation::UpdatePeriods)?;
        let periods = Periods::new(short, long)?;

        self.state.reconfigure(periods);
        tracing::info!(bot = %self.id, short_period = short, long_period = long, "SMA periods updated.");
        self.publish(EventKind::PeriodsUpdated {
            admin: caller.clone(),
            short_period: short,
            long_period: long,
        });
        Ok(())
    }

    /// Admin-only. Executes the pending signal against `ledger`.
    pub fn execute_trade(
        &mut self,
        signal: Signal,
        caller: &Principal,
        ledger: &mut dyn Ledger,
    ) -> Result<TradeReceipt> {
        self.authorizer
            .authorize(&self.state, caller, Operation::ExecuteTrade)?;
        let receipt = self
            .executor
            .execute(&mut self.state, signal, ledger)
            .inspect_err(|e| tracing::warn!(bot = %self.id, %signal, error = %e, "Trade rejected."))?;

        self.publish(EventKind::TradeExecuted(receipt.clone()));
        Ok(receipt)
    }

    /// Admin-only. Hands the record over to `new_admin`.
    pub fn transfer_admin(&mut self, new_admin: Principal, caller: &Principal) -> Result<()> {
        self.authorizer
            .authorize(&self.state, caller, Operation::TransferAdmin)?;

        let previous = self.state.admin().clone();
        self.state.set_admin(new_admin.clone());
        tracing::info!(bot = %self.id, %previous, admin = %new_admin, "Admin transferred.");
        self.publish(EventKind::AdminTransferred {
            previous,
            admin: new_admin,
        });
        Ok(())
    }

    fn publish(&self, kind: EventKind) {
        // Sending only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(BotEvent::now(self.id, kind));
    }
}
