// ============================================================================
// Transfer Results
// Closed outcome enums for the wealth leg, the marketed leg and the
// composed transaction
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of moving money from one holder to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WealthTransferResult {
    Success,
    /// Sender does not hold the amount
    SenderTooPoor,
    /// Debit refused although the balance check passed
    Error,
    /// Returned by a second `execute`; never stored
    AlreadyExecuted,
    NotExecuted,
}

/// Outcome of moving the marketed item from seller to buyer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarketedTransferResult {
    Success,
    /// Sender cannot supply the quantity
    SenderNotEnough,
    /// Recipient is unable to take delivery
    RecipientCannotReceive,
    Error,
    /// Returned by a second `execute`; never stored
    AlreadyExecuted,
    NotExecuted,
}

/// Outcome of a whole transaction, naming the leg responsible for a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransactionResult {
    WealthSenderTooPoor,
    MarketedSenderNotEnough,
    MarketedRecipientCannotReceive,
    WealthError,
    MarketedError,
    Success,
    AlreadyExecuted,
    WealthAlreadyExecuted,
    MarketedAlreadyExecuted,
    NotExecuted,
}

impl WealthTransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WealthTransferResult::Success)
    }
}

impl MarketedTransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MarketedTransferResult::Success)
    }
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::Success)
    }

    /// Whether the offer that produced this transaction must shrink.
    ///
    /// True when goods changed hands, or when the seller turned out unable
    /// to deliver.
    pub fn consumes_offer(&self) -> bool {
        matches!(
            self,
            TransactionResult::Success | TransactionResult::MarketedSenderNotEnough
        )
    }

    /// Whether the bid that produced this transaction must shrink.
    ///
    /// True when the trade went through, or the buyer could not pay or
    /// could not take delivery.
    pub fn consumes_bid(&self) -> bool {
        matches!(
            self,
            TransactionResult::Success
                | TransactionResult::WealthSenderTooPoor
                | TransactionResult::MarketedRecipientCannotReceive
        )
    }
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransactionResult::WealthSenderTooPoor => "buyer cannot pay",
            TransactionResult::MarketedSenderNotEnough => "seller cannot deliver",
            TransactionResult::MarketedRecipientCannotReceive => "buyer cannot receive goods",
            TransactionResult::WealthError => "payment failed",
            TransactionResult::MarketedError => "delivery failed",
            TransactionResult::Success => "success",
            TransactionResult::AlreadyExecuted => "already executed",
            TransactionResult::WealthAlreadyExecuted => "payment already executed",
            TransactionResult::MarketedAlreadyExecuted => "delivery already executed",
            TransactionResult::NotExecuted => "not executed",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_consumption_table() {
        use TransactionResult::*;

        let table = [
            (Success, true, true),
            (MarketedSenderNotEnough, true, false),
            (WealthSenderTooPoor, false, true),
            (MarketedRecipientCannotReceive, false, true),
            (WealthError, false, false),
            (MarketedError, false, false),
            (AlreadyExecuted, false, false),
            (WealthAlreadyExecuted, false, false),
            (MarketedAlreadyExecuted, false, false),
            (NotExecuted, false, false),
        ];

        for (result, offer, bid) in table {
            assert_eq!(result.consumes_offer(), offer, "offer side for {:?}", result);
            assert_eq!(result.consumes_bid(), bid, "bid side for {:?}", result);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TransactionResult::Success.to_string(), "success");
        assert_eq!(
            TransactionResult::WealthSenderTooPoor.to_string(),
            "buyer cannot pay"
        );
    }
}
