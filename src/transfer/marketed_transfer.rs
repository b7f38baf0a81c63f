// ============================================================================
// Marketed Transfer
// Single-use delivery of the marketed item, dispatched on the item kind
// ============================================================================

use crate::domain::{GoodsLedger, Holder, Marketed};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

use super::{MarketedTransferResult, WealthTransfer, WealthTransferResult};

enum Leg {
    /// Currency-for-currency: the delivery is itself a wealth transfer
    Currency(WealthTransfer),
    Goods(Arc<dyn GoodsLedger>),
}

/// Moves `quantity` of the marketed item from seller to buyer, at most once.
pub struct MarketedTransfer {
    sender: Holder,
    recipient: Holder,
    marketed: Marketed,
    quantity: Decimal,
    leg: Leg,
    state: Mutex<MarketedTransferResult>,
}

impl MarketedTransfer {
    pub(crate) fn new(
        sender: Holder,
        recipient: Holder,
        marketed: Marketed,
        quantity: Decimal,
    ) -> Self {
        let leg = match &marketed {
            Marketed::Currency(currency) => Leg::Currency(WealthTransfer::new(
                Arc::clone(&sender),
                Arc::clone(&recipient),
                currency.clone(),
                quantity,
            )),
            Marketed::Goods(ledger) => Leg::Goods(Arc::clone(ledger)),
        };

        Self {
            sender,
            recipient,
            marketed,
            quantity,
            leg,
            state: Mutex::new(MarketedTransferResult::NotExecuted),
        }
    }

    pub fn sender(&self) -> &Holder {
        &self.sender
    }

    pub fn recipient(&self) -> &Holder {
        &self.recipient
    }

    pub fn marketed(&self) -> &Marketed {
        &self.marketed
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn is_executed(&self) -> bool {
        *self.state.lock() != MarketedTransferResult::NotExecuted
    }

    pub fn state(&self) -> MarketedTransferResult {
        *self.state.lock()
    }

    pub fn predicted_result(&self) -> MarketedTransferResult {
        let state = self.state.lock();
        if *state != MarketedTransferResult::NotExecuted {
            return MarketedTransferResult::AlreadyExecuted;
        }

        match &self.leg {
            Leg::Currency(delegate) => from_wealth(delegate.predicted_result()),
            Leg::Goods(ledger) => {
                normalize(ledger.predict(&self.sender, &self.recipient, self.quantity))
            },
        }
    }

    pub fn execute(&self) -> MarketedTransferResult {
        let mut state = self.state.lock();
        if *state != MarketedTransferResult::NotExecuted {
            return MarketedTransferResult::AlreadyExecuted;
        }

        let outcome = match &self.leg {
            Leg::Currency(delegate) => from_wealth(delegate.execute()),
            Leg::Goods(ledger) => {
                normalize(ledger.transfer(&self.sender, &self.recipient, self.quantity))
            },
        };

        *state = outcome;
        outcome
    }

    /// Return delivered goods to the seller after the payment leg failed.
    ///
    /// Only a successful delivery can be rolled back. On success the stored
    /// state becomes `Error`: the leg no longer has any effect.
    pub(crate) fn roll_back(&self) -> bool {
        let mut state = self.state.lock();
        if *state != MarketedTransferResult::Success {
            return false;
        }

        let reverted = match &self.leg {
            Leg::Currency(delegate) => delegate.reverse(),
            Leg::Goods(ledger) => ledger.rollback(&self.sender, &self.recipient, self.quantity),
        };

        if reverted {
            *state = MarketedTransferResult::Error;
        }
        reverted
    }
}

fn from_wealth(result: WealthTransferResult) -> MarketedTransferResult {
    match result {
        WealthTransferResult::Success => MarketedTransferResult::Success,
        WealthTransferResult::SenderTooPoor => MarketedTransferResult::SenderNotEnough,
        WealthTransferResult::AlreadyExecuted => MarketedTransferResult::AlreadyExecuted,
        WealthTransferResult::Error | WealthTransferResult::NotExecuted => {
            MarketedTransferResult::Error
        },
    }
}

/// Ledgers only report real outcomes; pseudo-states become errors
fn normalize(result: MarketedTransferResult) -> MarketedTransferResult {
    match result {
        MarketedTransferResult::AlreadyExecuted | MarketedTransferResult::NotExecuted => {
            MarketedTransferResult::Error
        },
        other => other,
    }
}

impl fmt::Debug for MarketedTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketedTransfer")
            .field("sender", &self.sender.id())
            .field("recipient", &self.recipient.id())
            .field("marketed", &self.marketed.name())
            .field("quantity", &self.quantity)
            .field("state", &self.state())
            .finish()
    }
}
