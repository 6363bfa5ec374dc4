// In crates/execution/src/transfer.rs

use crate::types::{Counterparties, ExecutionSettings, SignalPolicy};
use crate::{Error, Executor, Ledger, Result};
use chrono::Utc;
use core_types::{AccountId, BotState, Signal, TradeReceipt};

/// Executes signals as a fixed-size transfer between the user's account and
/// the bot's counterpart account.
///
/// A `Buy` moves `trade_amount` from user to bot (the bot acquires the
/// asset); a `Sell` moves it back.
#[derive(Debug, Clone)]
pub struct TransferExecutor {
    trade_amount: u64,
    signal_policy: SignalPolicy,
    counterparties: Counterparties,
}

impl TransferExecutor {
    pub fn new(settings: &ExecutionSettings) -> Result<Self> {
        if settings.trade_amount == 0 {
            return Err(Error::InvalidSettings {
                reason: "trade_amount must be greater than zero".to_string(),
            });
        }
        let counterparties = Counterparties::new(
            settings.user_account.clone(),
            settings.bot_account.clone(),
        )?;
        Ok(Self {
            trade_amount: settings.trade_amount,
            signal_policy: settings.signal_policy,
            counterparties,
        })
    }

    /// Source and destination of the transfer implied by `signal`.
    fn route(&self, signal: Signal) -> Result<(&AccountId, &AccountId)> {
        let user = self.counterparties.user_account();
        let bot = self.counterparties.bot_account();
        match signal {
            Signal::Buy => Ok((user, bot)),
            Signal::Sell => Ok((bot, user)),
            Signal::None => Err(Error::NoActionableSignal),
        }
    }
}

impl Executor for TransferExecutor {
    fn name(&self) -> &'static str {
        "TransferExecutor"
    }

    fn execute(
        &self,
        state: &mut BotState,
        signal: Signal,
        ledger: &mut dyn Ledger,
    ) -> Result<TradeReceipt> {
        // --- 1. Check the request against the pending signal ---
        let pending = state.last_signal();
        if !pending.is_actionable() {
            return Err(Error::NoActionableSignal);
        }
        let (from, to) = self.route(signal)?;
        if signal != pending {
            return Err(Error::SignalMismatch {
                requested: signal,
                pending,
            });
        }

        // --- 2. Move the funds (atomic on the ledger side) ---
        ledger.transfer(from, to, self.trade_amount)?;

        // --- 3. Record the trade on the bot ---
        let sequence = state.record_trade();
        if self.signal_policy == SignalPolicy::Consume {
            state.set_last_signal(Signal::None);
        }

        let receipt = TradeReceipt {
            signal,
            from: from.clone(),
            to: to.clone(),
            amount: self.trade_amount,
            price: state.last_price(),
            sequence,
            executed_at: Utc::now(),
        };
        tracing::info!(
            %signal,
            from = %receipt.from,
            to = %receipt.to,
            amount = receipt.amount,
            sequence,
            "Trade executed."
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryLedger;
    use core_types::{Periods, Principal};

    fn settings(policy: SignalPolicy) -> ExecutionSettings {
        ExecutionSettings {
            trade_amount: 1,
            signal_policy: policy,
            user_account: AccountId::from("user"),
            bot_account: AccountId::from("bot"),
        }
    }

    fn ledger() -> InMemoryLedger {
        [(AccountId::from("user"), 3), (AccountId::from("bot"), 3)]
            .into_iter()
            .collect()
    }

    fn state_with(signal: Signal) -> BotState {
        let mut s = BotState::new(Principal::from("admin"), Periods::new(5, 20).unwrap());
        s.record_price(101);
        s.set_last_signal(signal);
        s
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let mut zero = settings(SignalPolicy::Retain);
        zero.trade_amount = 0;
        assert!(matches!(TransferExecutor::new(&zero), Err(Error::InvalidSettings { .. })));

        let mut same = settings(SignalPolicy::Retain);
        same.bot_account = AccountId::from("user");
        assert!(matches!(TransferExecutor::new(&same), Err(Error::InvalidSettings { .. })));
    }

    #[test]
    fn test_buy_moves_user_to_bot_and_sell_reverses() {
        let executor = TransferExecutor::new(&settings(SignalPolicy::Retain)).unwrap();
        let mut l = ledger();

        let mut s = state_with(Signal::Buy);
        let receipt = executor.execute(&mut s, Signal::Buy, &mut l).unwrap();
        assert_eq!(receipt.from, AccountId::from("user"));
        assert_eq!(receipt.to, AccountId::from("bot"));
        assert_eq!(receipt.price, Some(101));
        assert_eq!(receipt.sequence, 1);
        assert_eq!(l.balance(&"user".into()), Some(2));
        assert_eq!(l.balance(&"bot".into()), Some(4));

        s.set_last_signal(Signal::Sell);
        executor.execute(&mut s, Signal::Sell, &mut l).unwrap();
        assert_eq!(l, ledger());
        assert_eq!(s.trades_executed(), 2);
    }

    #[test]
    fn test_no_pending_signal_changes_nothing() {
        let executor = TransferExecutor::new(&settings(SignalPolicy::Retain)).unwrap();
        let mut l = ledger();
        let mut s = state_with(Signal::None);
        let before = s.clone();

        for requested in [Signal::Buy, Signal::Sell, Signal::None] {
            assert_eq!(
                executor.execute(&mut s, requested, &mut l),
                Err(Error::NoActionableSignal)
            );
        }
        assert_eq!(s, before);
        assert_eq!(l, ledger());
    }

    #[test]
    fn test_mismatched_request_is_rejected() {
        let executor = TransferExecutor::new(&settings(SignalPolicy::Retain)).unwrap();
        let mut l = ledger();
        let mut s = state_with(Signal::Buy);
        assert_eq!(
            executor.execute(&mut s, Signal::Sell, &mut l),
            Err(Error::SignalMismatch { requested: Signal::Sell, pending: Signal::Buy })
        );
        assert_eq!(l, ledger());
        assert_eq!(s.trades_executed(), 0);
    }

    #[test]
    fn test_ledger_failure_leaves_state_untouched() {
        let executor = TransferExecutor::new(&settings(SignalPolicy::Consume)).unwrap();
        let mut l: InMemoryLedger = [(AccountId::from("user"), 0), (AccountId::from("bot"), 0)]
            .into_iter()
            .collect();
        let mut s = state_with(Signal::Buy);
        let before = s.clone();

        assert!(matches!(
            executor.execute(&mut s, Signal::Buy, &mut l),
            Err(Error::InsufficientFunds { .. })
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn test_retain_allows_replay_and_consume_prevents_it() {
        let retain = TransferExecutor::new(&settings(SignalPolicy::Retain)).unwrap();
        let mut l = ledger();
        let mut s = state_with(Signal::Buy);
        retain.execute(&mut s, Signal::Buy, &mut l).unwrap();
        assert_eq!(s.last_signal(), Signal::Buy);
        retain.execute(&mut s, Signal::Buy, &mut l).unwrap();
        assert_eq!(l.balance(&"user".into()), Some(1));

        let consume = TransferExecutor::new(&settings(SignalPolicy::Consume)).unwrap();
        let mut l = ledger();
        let mut s = state_with(Signal::Buy);
        consume.execute(&mut s, Signal::Buy, &mut l).unwrap();
        assert_eq!(s.last_signal(), Signal::None);
        assert_eq!(
            consume.execute(&mut s, Signal::Buy, &mut l),
            Err(Error::NoActionableSignal)
        );
        assert_eq!(l.balance(&"user".into()), Some(2));
    }
}
