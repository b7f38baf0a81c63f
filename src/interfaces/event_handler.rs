// ============================================================================
// Event Handler Interface
// Defines the contract for handling book and settlement events
// ============================================================================

use crate::domain::{EntryId, HolderId, Side};
use crate::transfer::{TransactionId, TransactionResult};
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by a market
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarketEvent {
    /// Bid accepted into the book
    BidAdded {
        entry_id: EntryId,
        holder: HolderId,
        quantity: Decimal,
        unit_price: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// Offer accepted into the book
    OfferAdded {
        entry_id: EntryId,
        holder: HolderId,
        quantity: Decimal,
        unit_price: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// Entry refused at submission
    EntryRejected {
        entry_id: EntryId,
        side: Side,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Bid removed before matching because the bidder cannot cover it
    BidEvicted {
        entry_id: EntryId,
        holder: HolderId,
        timestamp: DateTime<Utc>,
    },

    /// Offer removed before matching because the seller cannot supply it
    OfferEvicted {
        entry_id: EntryId,
        holder: HolderId,
        timestamp: DateTime<Utc>,
    },

    /// A matched pair was settled, successfully or not
    TransactionExecuted {
        transaction_id: TransactionId,
        bid_id: EntryId,
        offer_id: EntryId,
        quantity: Decimal,
        unit_price: Decimal,
        result: TransactionResult,
        timestamp: DateTime<Utc>,
    },

    /// Entry shrank and stays in the book with the same identity
    EntryReduced {
        entry_id: EntryId,
        side: Side,
        remaining_quantity: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// Entry fully consumed and removed from the book
    EntryFilled {
        entry_id: EntryId,
        side: Side,
        timestamp: DateTime<Utc>,
    },

    /// Matching pass finished
    UpdateCompleted {
        transactions: usize,
        successful: usize,
        bids_remaining: usize,
        offers_remaining: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing market events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a market event
    fn on_event(&self, event: MarketEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<MarketEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: MarketEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: MarketEvent) {
        match &event {
            MarketEvent::TransactionExecuted { result, .. } if !result.is_success() => {
                tracing::info!("Market event: {:?}", event);
            },
            MarketEvent::UpdateCompleted { .. } => tracing::info!("Market event: {:?}", event),
            _ => tracing::debug!("Market event: {:?}", event),
        }
    }
}

/// Forwards every event into a crossbeam channel
pub struct ChannelEventHandler {
    sender: Sender<MarketEvent>,
}

impl ChannelEventHandler {
    /// Handler paired with the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, Receiver<MarketEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: Sender<MarketEvent>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelEventHandler {
    fn on_event(&self, event: MarketEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("event receiver dropped, discarding market event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> MarketEvent {
        MarketEvent::EntryFilled {
            entry_id: EntryId::new(),
            side: Side::Offer,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpEventHandler;
        handler.on_event(filled());
        // Should not panic
    }

    #[test]
    fn test_channel_handler_forwards_in_order() {
        let (handler, receiver) = ChannelEventHandler::unbounded();
        let first = filled();
        let second = filled();

        handler.on_events(vec![first.clone(), second.clone()]);

        assert_eq!(receiver.try_recv().unwrap(), first);
        assert_eq!(receiver.try_recv().unwrap(), second);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_handler_survives_dropped_receiver() {
        let (handler, receiver) = ChannelEventHandler::unbounded();
        drop(receiver);
        handler.on_event(filled());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_event_serializes() {
        let json = serde_json::to_string(&filled()).unwrap();
        assert!(json.contains("EntryFilled"));
    }
}
