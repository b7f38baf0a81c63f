// ============================================================================
// Transaction
// A goods leg and a payment leg settled together, predict-then-execute
// ============================================================================

use crate::domain::{Currency, EntryId, Valuable};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use super::{
    MarketedTransfer, MarketedTransferResult, TransactionResult, WealthTransfer,
    WealthTransferResult,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One trade: the marketed item moves seller to buyer, money moves buyer to
/// seller.
///
/// # Execution
///
/// `execute` runs at most once. It first predicts the outcome of both legs
/// and stops without touching either leg unless the prediction is a
/// success. The goods leg runs next, then the payment leg. When the payment
/// fails after the goods moved, the goods are sent back so a failed
/// transaction never leaves one leg applied. The failing leg is named in
/// the [`TransactionResult`].
pub struct Transaction {
    id: TransactionId,
    created_at: DateTime<Utc>,
    bid_id: Option<EntryId>,
    offer_id: Option<EntryId>,
    marketed: MarketedTransfer,
    wealth: WealthTransfer,
    state: Mutex<TransactionResult>,
}

impl Transaction {
    pub fn new(marketed: MarketedTransfer, wealth: WealthTransfer) -> Self {
        Self {
            id: TransactionId::new(),
            created_at: Utc::now(),
            bid_id: None,
            offer_id: None,
            marketed,
            wealth,
            state: Mutex::new(TransactionResult::NotExecuted),
        }
    }

    /// Record which book entries were paired into this transaction
    pub(crate) fn for_entries(mut self, bid_id: EntryId, offer_id: EntryId) -> Self {
        self.bid_id = Some(bid_id);
        self.offer_id = Some(offer_id);
        self
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn bid_id(&self) -> Option<EntryId> {
        self.bid_id
    }

    pub fn offer_id(&self) -> Option<EntryId> {
        self.offer_id
    }

    pub fn marketed_component(&self) -> &MarketedTransfer {
        &self.marketed
    }

    pub fn wealth_component(&self) -> &WealthTransfer {
        &self.wealth
    }

    pub fn quantity(&self) -> Decimal {
        self.marketed.quantity()
    }

    /// Price paid per unit, `None` for a zero-quantity transaction
    pub fn unit_price(&self) -> Option<Decimal> {
        self.wealth.amount().checked_div(self.marketed.quantity())
    }

    pub fn is_executed(&self) -> bool {
        *self.state.lock() != TransactionResult::NotExecuted
    }

    pub fn state(&self) -> TransactionResult {
        *self.state.lock()
    }

    /// Outcome `execute` would have right now. Mutates nothing.
    pub fn predicted_result(&self) -> TransactionResult {
        let state = self.state.lock();
        if *state != TransactionResult::NotExecuted {
            return TransactionResult::AlreadyExecuted;
        }
        self.predict()
    }

    pub fn execute(&self) -> TransactionResult {
        let mut state = self.state.lock();
        if *state != TransactionResult::NotExecuted {
            return TransactionResult::AlreadyExecuted;
        }

        let outcome = self.settle();
        *state = outcome;
        outcome
    }

    fn predict(&self) -> TransactionResult {
        match self.wealth.predicted_result() {
            WealthTransferResult::SenderTooPoor => return TransactionResult::WealthSenderTooPoor,
            WealthTransferResult::AlreadyExecuted => {
                return TransactionResult::WealthAlreadyExecuted
            },
            _ => {},
        }

        match self.marketed.predicted_result() {
            MarketedTransferResult::SenderNotEnough => TransactionResult::MarketedSenderNotEnough,
            MarketedTransferResult::RecipientCannotReceive => {
                TransactionResult::MarketedRecipientCannotReceive
            },
            MarketedTransferResult::AlreadyExecuted => TransactionResult::MarketedAlreadyExecuted,
            MarketedTransferResult::Error => TransactionResult::MarketedError,
            MarketedTransferResult::Success | MarketedTransferResult::NotExecuted => {
                TransactionResult::Success
            },
        }
    }

    fn settle(&self) -> TransactionResult {
        let expected = self.predict();
        if expected != TransactionResult::Success {
            return expected;
        }

        match self.marketed.execute() {
            MarketedTransferResult::Success => {},
            MarketedTransferResult::SenderNotEnough => {
                return TransactionResult::MarketedSenderNotEnough
            },
            MarketedTransferResult::RecipientCannotReceive => {
                return TransactionResult::MarketedRecipientCannotReceive
            },
            _ => return TransactionResult::MarketedError,
        }

        let failure = match self.wealth.execute() {
            WealthTransferResult::Success => return TransactionResult::Success,
            WealthTransferResult::SenderTooPoor => TransactionResult::WealthSenderTooPoor,
            _ => TransactionResult::WealthError,
        };

        if !self.marketed.roll_back() {
            tracing::warn!(
                transaction = %self.id,
                seller = %self.marketed.sender().id(),
                buyer = %self.marketed.recipient().id(),
                quantity = %self.marketed.quantity(),
                "payment failed and delivered goods could not be returned"
            );
        }
        failure
    }
}

impl Valuable for Transaction {
    fn currency(&self) -> &Currency {
        self.wealth.currency()
    }

    fn value(&self) -> Decimal {
        self.wealth.amount()
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("bid_id", &self.bid_id)
            .field("offer_id", &self.offer_id)
            .field("marketed", &self.marketed)
            .field("wealth", &self.wealth)
            .field("state", &self.state())
            .finish()
    }
}
