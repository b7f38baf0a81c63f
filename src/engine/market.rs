// ============================================================================
// Default Market
// Book maintenance, submission checks and the matching pass
// ============================================================================

use crate::domain::order_book::sort_best_first;
use crate::domain::{
    Bid, BookSnapshot, Currency, EntryId, MarketBid, MarketConfig, MarketOffer, Marketed, Offer,
    OrderBookSide, Side, Valuable,
};
use crate::error::MarketResult;
use crate::interfaces::{EventHandler, Market, MarketEvent, MatchingAlgorithm};
use crate::transfer::Transaction;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe market for one item with a pluggable crossing algorithm
pub struct DefaultMarket {
    config: MarketConfig,

    /// Bid side of the book
    bids: OrderBookSide<Bid>,

    /// Offer side of the book
    offers: OrderBookSide<Offer>,

    algorithm: Box<dyn MatchingAlgorithm>,

    event_handler: Arc<dyn EventHandler>,

    /// Completed matching passes
    passes: AtomicU64,
}

impl DefaultMarket {
    /// Create a market. The configuration is taken as given; use
    /// [`create_from_config`](crate::engine::create_from_config) to have it
    /// validated.
    pub fn new(
        config: MarketConfig,
        algorithm: Box<dyn MatchingAlgorithm>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            config,
            bids: OrderBookSide::new(),
            offers: OrderBookSide::new(),
            algorithm,
            event_handler,
            passes: AtomicU64::new(0),
        }
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn algorithm_name(&self) -> &str {
        self.algorithm.name()
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    /// Number of matching passes run so far
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Acquire)
    }

    /// Aggregated view of the best `levels` price levels on each side
    pub fn depth(&self, levels: usize) -> BookSnapshot {
        let currency = &self.config.transaction_currency;
        BookSnapshot::with_depth(
            self.config.label.clone(),
            self.bids.depth(currency, levels),
            self.offers.depth(currency, levels),
        )
    }

    fn check_currency<V: Valuable>(&self, entry: &V) -> MarketResult<()> {
        self.config.transaction_currency.ensure_same(entry.currency())
    }

    fn reject(&self, entry_id: EntryId, side: Side, reason: String) {
        tracing::debug!(market = %self.config.label, entry = %entry_id, %side, %reason, "entry rejected");
        self.event_handler.on_event(MarketEvent::EntryRejected {
            entry_id,
            side,
            reason,
            timestamp: Utc::now(),
        });
    }

    /// Drop bids whose bidder cannot cover the full bid value
    fn evict_bids(
        &self,
        bids: &mut HashMap<EntryId, MarketBid>,
        events: &mut Vec<MarketEvent>,
    ) {
        if !self.config.evict_insolvent_bids {
            return;
        }

        bids.retain(|_, bid| {
            let solvent = bid.bidder().has(bid.currency(), bid.value());
            if !solvent {
                tracing::debug!(market = %self.config.label, bid = %bid.id(), "evicting insolvent bid");
                events.push(MarketEvent::BidEvicted {
                    entry_id: bid.id(),
                    holder: bid.bidder().id(),
                    timestamp: Utc::now(),
                });
            }
            solvent
        });
    }

    fn evict_offers(
        &self,
        offers: &mut HashMap<EntryId, MarketOffer>,
        events: &mut Vec<MarketEvent>,
    ) {
        if !self.config.evict_undeliverable_offers {
            return;
        }

        offers.retain(|_, offer| {
            let deliverable = self
                .config
                .marketed
                .can_supply(offer.seller(), offer.quantity());
            if !deliverable {
                tracing::debug!(market = %self.config.label, offer = %offer.id(), "evicting undeliverable offer");
                events.push(MarketEvent::OfferEvicted {
                    entry_id: offer.id(),
                    holder: offer.seller().id(),
                    timestamp: Utc::now(),
                });
            }
            deliverable
        });
    }
}

impl Market for DefaultMarket {
    fn marketed(&self) -> &Marketed {
        &self.config.marketed
    }

    fn transaction_currency(&self) -> &Currency {
        &self.config.transaction_currency
    }

    fn add_bid(&self, bid: MarketBid) -> MarketResult<()> {
        if let Err(err) = self.check_currency(&bid) {
            self.reject(bid.id(), Side::Bid, err.to_string());
            return Err(err);
        }

        let event = MarketEvent::BidAdded {
            entry_id: bid.id(),
            holder: bid.bidder().id(),
            quantity: bid.quantity(),
            unit_price: bid.unit_price(),
            timestamp: Utc::now(),
        };
        self.bids.add(bid);
        self.event_handler.on_event(event);
        Ok(())
    }

    fn add_offer(&self, offer: MarketOffer) -> MarketResult<()> {
        if let Err(err) = self.check_currency(&offer) {
            self.reject(offer.id(), Side::Offer, err.to_string());
            return Err(err);
        }

        let event = MarketEvent::OfferAdded {
            entry_id: offer.id(),
            holder: offer.seller().id(),
            quantity: offer.quantity(),
            unit_price: offer.unit_price(),
            timestamp: Utc::now(),
        };
        self.offers.add(offer);
        self.event_handler.on_event(event);
        Ok(())
    }

    fn bids(&self) -> Vec<MarketBid> {
        self.bids.snapshot()
    }

    fn offers(&self) -> Vec<MarketOffer> {
        self.offers.snapshot()
    }

    fn update(&self) -> Vec<Transaction> {
        let mut events = Vec::new();

        // Lock order: bids, then offers
        let mut bid_book = self.bids.write();
        self.evict_bids(&mut bid_book, &mut events);
        let mut offer_book = self.offers.write();
        self.evict_offers(&mut offer_book, &mut events);

        let mut bids: Vec<MarketBid> = bid_book.drain().map(|(_, bid)| bid).collect();
        let mut offers: Vec<MarketOffer> = offer_book.drain().map(|(_, offer)| offer).collect();
        sort_best_first(&mut bids);
        sort_best_first(&mut offers);

        let transactions = self.algorithm.cross(
            &self.config.marketed,
            &self.config.transaction_currency,
            &mut bids,
            &mut offers,
            &mut events,
        );

        bid_book.extend(bids.into_iter().map(|bid| (bid.id(), bid)));
        offer_book.extend(offers.into_iter().map(|offer| (offer.id(), offer)));
        let bids_remaining = bid_book.len();
        let offers_remaining = offer_book.len();
        drop(offer_book);
        drop(bid_book);

        let successful = transactions
            .iter()
            .filter(|transaction| transaction.state().is_success())
            .count();
        let pass = self.passes.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            market = %self.config.label,
            pass,
            transactions = transactions.len(),
            successful,
            bids_remaining,
            offers_remaining,
            "matching pass complete"
        );

        events.push(MarketEvent::UpdateCompleted {
            transactions: transactions.len(),
            successful,
            bids_remaining,
            offers_remaining,
            timestamp: Utc::now(),
        });
        self.event_handler.on_events(events);

        transactions
    }
}
