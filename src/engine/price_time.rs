// ============================================================================
// Price/Time Priority Crossing Algorithm
// Greedy best-bid against best-offer matching with per-leg book updates
// ============================================================================

use crate::domain::{BookSide, Currency, Entry, MarketBid, MarketOffer, Marketed};
use crate::interfaces::{MarketEvent, MatchingAlgorithm};
use crate::transfer::{Transaction, WealthTransfer};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Arc;

/// Price/Time Priority crossing
///
/// Bids are walked best first with a cursor and always meet the best
/// remaining offer. Each pair trades `min(quantities)` at the lower of the
/// two unit prices. The settlement outcome decides which side shrinks:
///
/// | Outcome                                     | Offer   | Bid     |
/// |---------------------------------------------|---------|---------|
/// | success                                     | shrinks | shrinks |
/// | seller cannot deliver                       | shrinks | kept    |
/// | buyer cannot pay, or cannot take delivery   | kept    | shrinks |
/// | anything else                               | kept    | kept    |
///
/// Prices cross when the bid's significant price reaches the offer's; the
/// trade itself uses the raw prices.
///
/// The cursor stays on the current slot when the bid was removed or the
/// head offer was consumed, and moves on otherwise. Each step therefore
/// removes a bid, shrinks the offers, or advances the cursor, so a pass
/// always ends.
///
/// # Example
/// ```text
/// Bids:   10 @ 6 (A)        Offers: 4 @ 5 (X)
///          3 @ 5 (B)                6 @ 6 (Y)
///
/// A meets X: 4 @ 5, X filled, A keeps 6 and stays under the cursor
/// A meets Y: 6 @ 6, both filled
/// B meets nothing, pass ends
/// ```
pub struct PriceTimePriority;

impl PriceTimePriority {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceTimePriority {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingAlgorithm for PriceTimePriority {
    fn cross(
        &self,
        marketed: &Marketed,
        currency: &Currency,
        bids: &mut Vec<MarketBid>,
        offers: &mut Vec<MarketOffer>,
        events: &mut Vec<MarketEvent>,
    ) -> Vec<Transaction> {
        let mut transactions = Vec::new();

        // Bids behind the cursor are final for this pass
        let mut passed: Vec<MarketBid> = Vec::with_capacity(bids.len());
        let mut pending_bids: VecDeque<MarketBid> = bids.drain(..).collect();
        let mut pending_offers: VecDeque<MarketOffer> = offers.drain(..).collect();

        while let (Some(bid), Some(offer)) = (pending_bids.front(), pending_offers.front()) {
            if !self.prices_cross(bid, offer) {
                break;
            }

            let quantity = offer.quantity().min(bid.quantity());
            let unit_price = offer.unit_price().min(bid.unit_price());
            let Some(amount) = quantity.checked_mul(unit_price) else {
                tracing::warn!(
                    bid = %bid.id(),
                    offer = %offer.id(),
                    quantity = %quantity,
                    unit_price = %unit_price,
                    "trade value overflows, bid skipped for this pass"
                );
                if let Some(bid) = pending_bids.pop_front() {
                    passed.push(bid);
                }
                continue;
            };

            let transaction = Transaction::new(
                marketed.transfer_for(Arc::clone(offer.seller()), Arc::clone(bid.bidder()), quantity),
                WealthTransfer::new(
                    Arc::clone(bid.bidder()),
                    Arc::clone(offer.seller()),
                    currency.clone(),
                    amount,
                ),
            )
            .for_entries(bid.id(), offer.id());

            let result = transaction.execute();
            tracing::debug!(
                transaction = %transaction.id(),
                bid = %bid.id(),
                offer = %offer.id(),
                quantity = %quantity,
                unit_price = %unit_price,
                result = %result,
                "settled matched pair"
            );
            events.push(MarketEvent::TransactionExecuted {
                transaction_id: transaction.id(),
                bid_id: bid.id(),
                offer_id: offer.id(),
                quantity,
                unit_price,
                result,
                timestamp: Utc::now(),
            });

            if !result.consumes_offer() && !result.consumes_bid() {
                tracing::warn!(
                    bid = %bid.id(),
                    offer = %offer.id(),
                    result = %result,
                    "settlement failed on both legs, offer stays at the head of the book"
                );
            }

            let offer_consumed = result.consumes_offer();
            if offer_consumed {
                consume_front(&mut pending_offers, quantity, events);
            }

            let bid_removed = result.consumes_bid() && consume_front(&mut pending_bids, quantity, events);

            if !bid_removed && !offer_consumed {
                // Head offer unchanged, so leave this bid and try the next one
                if let Some(bid) = pending_bids.pop_front() {
                    passed.push(bid);
                }
            }

            transactions.push(transaction);
        }

        passed.extend(pending_bids);
        *bids = passed;
        offers.extend(pending_offers);

        transactions
    }

    fn name(&self) -> &str {
        "PriceTime"
    }
}

/// Shrink the front entry by `filled`, replacing it with its remainder.
/// Returns true when nothing was left and the entry was removed.
fn consume_front<S: BookSide>(
    entries: &mut VecDeque<Entry<S>>,
    filled: Decimal,
    events: &mut Vec<MarketEvent>,
) -> bool {
    let Some(entry) = entries.pop_front() else {
        return false;
    };

    match entry.remainder_after(filled) {
        Some(remainder) => {
            events.push(MarketEvent::EntryReduced {
                entry_id: remainder.id(),
                side: S::SIDE,
                remaining_quantity: remainder.quantity(),
                timestamp: Utc::now(),
            });
            entries.push_front(remainder);
            false
        },
        None => {
            events.push(MarketEvent::EntryFilled {
                entry_id: entry.id(),
                side: S::SIDE,
                timestamp: Utc::now(),
            });
            true
        },
    }
}
