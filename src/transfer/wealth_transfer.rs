// ============================================================================
// Wealth Transfer
// Single-use movement of an amount of currency between two holders
// ============================================================================

use crate::domain::{Currency, Holder};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

use super::WealthTransferResult;

/// Moves `amount` of one currency from sender to recipient, at most once.
///
/// Never holds both holders' guards at the same time: the debit and the
/// credit are separate calls on each holder.
pub struct WealthTransfer {
    sender: Holder,
    recipient: Holder,
    currency: Currency,
    amount: Decimal,
    state: Mutex<WealthTransferResult>,
}

impl WealthTransfer {
    pub fn new(sender: Holder, recipient: Holder, currency: Currency, amount: Decimal) -> Self {
        Self {
            sender,
            recipient,
            currency,
            amount,
            state: Mutex::new(WealthTransferResult::NotExecuted),
        }
    }

    pub fn sender(&self) -> &Holder {
        &self.sender
    }

    pub fn recipient(&self) -> &Holder {
        &self.recipient
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_executed(&self) -> bool {
        *self.state.lock() != WealthTransferResult::NotExecuted
    }

    /// Stored outcome; `NotExecuted` until the first `execute`
    pub fn state(&self) -> WealthTransferResult {
        *self.state.lock()
    }

    /// Outcome `execute` would have right now. Mutates nothing.
    pub fn predicted_result(&self) -> WealthTransferResult {
        let state = self.state.lock();
        if *state != WealthTransferResult::NotExecuted {
            return WealthTransferResult::AlreadyExecuted;
        }
        self.check_sender()
    }

    pub fn execute(&self) -> WealthTransferResult {
        let mut state = self.state.lock();
        if *state != WealthTransferResult::NotExecuted {
            return WealthTransferResult::AlreadyExecuted;
        }

        let outcome = match self.check_sender() {
            WealthTransferResult::Success => self.debit_then_credit(),
            other => other,
        };

        *state = outcome;
        outcome
    }

    /// Send a completed transfer back to where it came from.
    ///
    /// Returns false when the recipient no longer holds the amount; nothing
    /// moves in that case.
    pub(crate) fn reverse(&self) -> bool {
        if !self.amount.is_zero() && !self.recipient.take(&self.currency, self.amount) {
            return false;
        }
        self.sender.give(&self.currency, self.amount);
        true
    }

    fn check_sender(&self) -> WealthTransferResult {
        let balance = self.sender.current_wealth().amount(&self.currency);
        if balance < self.amount {
            WealthTransferResult::SenderTooPoor
        } else {
            WealthTransferResult::Success
        }
    }

    fn debit_then_credit(&self) -> WealthTransferResult {
        // take() re-validates under the sender's guard, so a balance that
        // moved since check_sender() cannot be overdrawn
        if !self.amount.is_zero() && !self.sender.take(&self.currency, self.amount) {
            tracing::debug!(
                sender = %self.sender.id(),
                amount = %self.amount,
                currency = %self.currency,
                "debit refused after balance check passed"
            );
            return WealthTransferResult::Error;
        }

        if !self.recipient.give(&self.currency, self.amount) {
            // Put the debit back; the sender held it a moment ago
            self.sender.give(&self.currency, self.amount);
            tracing::warn!(
                recipient = %self.recipient.id(),
                amount = %self.amount,
                currency = %self.currency,
                "credit refused, debit returned to sender"
            );
            return WealthTransferResult::Error;
        }
        WealthTransferResult::Success
    }
}

impl Clone for WealthTransfer {
    /// Clones the parties and amount; the copy starts unexecuted
    fn clone(&self) -> Self {
        Self::new(
            Arc::clone(&self.sender),
            Arc::clone(&self.recipient),
            self.currency.clone(),
            self.amount,
        )
    }
}

impl fmt::Debug for WealthTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WealthTransfer")
            .field("sender", &self.sender.id())
            .field("recipient", &self.recipient.id())
            .field("currency", &self.currency.name())
            .field("amount", &self.amount)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Agent, WealthHolder};

    fn pound() -> Currency {
        Currency::new("pound", "pounds", 2, "£%d").unwrap()
    }

    fn funded(name: &str, amount: i64) -> Arc<Agent> {
        let agent = Agent::shared(name);
        agent.give(&pound(), Decimal::from(amount));
        agent
    }

    #[test]
    fn test_successful_transfer() {
        let sender = funded("sender", 100);
        let recipient = funded("recipient", 0);
        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        assert_eq!(transfer.predicted_result(), WealthTransferResult::Success);
        assert_eq!(transfer.state(), WealthTransferResult::NotExecuted);
        assert!(!transfer.is_executed());

        assert_eq!(transfer.execute(), WealthTransferResult::Success);
        assert_eq!(sender.balance(&pound()), Decimal::from(70));
        assert_eq!(recipient.balance(&pound()), Decimal::from(30));
        assert_eq!(transfer.state(), WealthTransferResult::Success);
        assert!(transfer.is_executed());
    }

    #[test]
    fn test_second_execute_is_a_no_op() {
        let sender = funded("sender", 100);
        let recipient = funded("recipient", 0);
        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        transfer.execute();
        assert_eq!(transfer.execute(), WealthTransferResult::AlreadyExecuted);
        assert_eq!(transfer.predicted_result(), WealthTransferResult::AlreadyExecuted);
        assert_eq!(sender.balance(&pound()), Decimal::from(70));
        assert_eq!(recipient.balance(&pound()), Decimal::from(30));
        // The stored state is the first outcome, not the pseudo-state
        assert_eq!(transfer.state(), WealthTransferResult::Success);
    }

    #[test]
    fn test_sender_too_poor() {
        let sender = funded("sender", 10);
        let recipient = funded("recipient", 0);
        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        assert_eq!(transfer.predicted_result(), WealthTransferResult::SenderTooPoor);
        assert_eq!(transfer.execute(), WealthTransferResult::SenderTooPoor);
        assert_eq!(transfer.state(), WealthTransferResult::SenderTooPoor);
        assert_eq!(sender.balance(&pound()), Decimal::from(10));
        assert_eq!(recipient.balance(&pound()), Decimal::ZERO);

        // Failure is terminal too
        sender.give(&pound(), Decimal::from(100));
        assert_eq!(transfer.execute(), WealthTransferResult::AlreadyExecuted);
        assert_eq!(recipient.balance(&pound()), Decimal::ZERO);
    }

    #[test]
    fn test_prediction_does_not_mutate() {
        let sender = funded("sender", 100);
        let recipient = funded("recipient", 0);
        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        for _ in 0..3 {
            assert_eq!(transfer.predicted_result(), WealthTransferResult::Success);
        }
        assert_eq!(sender.balance(&pound()), Decimal::from(100));
        assert!(!transfer.is_executed());
    }

    /// Reports a healthy balance but refuses every debit, as a holder whose
    /// balance is drained between the check and the debit would.
    #[derive(Debug)]
    struct DrainedHolder {
        inner: Agent,
    }

    impl WealthHolder for DrainedHolder {
        fn id(&self) -> crate::domain::HolderId {
            self.inner.id()
        }

        fn current_wealth(&self) -> crate::domain::WealthSnapshot {
            self.inner.current_wealth()
        }

        fn give(&self, currency: &Currency, amount: Decimal) -> bool {
            self.inner.give(currency, amount)
        }

        fn take(&self, _currency: &Currency, _amount: Decimal) -> bool {
            false
        }

        fn has(&self, currency: &Currency, amount: Decimal) -> bool {
            self.inner.has(currency, amount)
        }
    }

    #[test]
    fn test_refused_debit_is_an_error_without_effect() {
        let sender = Arc::new(DrainedHolder {
            inner: Agent::new("racer"),
        });
        sender.give(&pound(), Decimal::from(100));
        let recipient = funded("recipient", 0);

        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        assert_eq!(transfer.predicted_result(), WealthTransferResult::Success);
        assert_eq!(transfer.execute(), WealthTransferResult::Error);
        assert_eq!(recipient.balance(&pound()), Decimal::ZERO);
        assert_eq!(sender.inner.balance(&pound()), Decimal::from(100));
    }

    #[test]
    fn test_refused_credit_returns_the_debit() {
        let sender = funded("sender", 100);
        let recipient = Agent::shared("recipient");
        recipient.give(&pound(), Decimal::MAX);

        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        assert_eq!(transfer.execute(), WealthTransferResult::Error);
        assert_eq!(sender.balance(&pound()), Decimal::from(100));
        assert_eq!(recipient.balance(&pound()), Decimal::MAX);
    }

    #[test]
    fn test_reverse_restores_balances() {
        let sender = funded("sender", 100);
        let recipient = funded("recipient", 0);
        let transfer = WealthTransfer::new(
            sender.clone(),
            recipient.clone(),
            pound(),
            Decimal::from(30),
        );

        transfer.execute();
        assert!(transfer.reverse());
        assert_eq!(sender.balance(&pound()), Decimal::from(100));
        assert_eq!(recipient.balance(&pound()), Decimal::ZERO);

        // Nothing left to send back
        assert!(!transfer.reverse());
    }
}
