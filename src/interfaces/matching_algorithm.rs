// ============================================================================
// Matching Algorithm Interface
// Defines the contract for pluggable crossing algorithms
// ============================================================================

use crate::domain::{Currency, MarketBid, MarketOffer, Marketed, Valuable};
use crate::transfer::Transaction;

use super::MarketEvent;

/// Strategy pattern interface for matching algorithms
pub trait MatchingAlgorithm: Send + Sync {
    /// Cross the sorted bid and offer lists against each other
    ///
    /// # Arguments
    /// * `marketed` - The item changing hands
    /// * `currency` - Currency the payment leg is made in
    /// * `bids` - Bids, best first; left holding the surviving bids
    /// * `offers` - Offers, best first; left holding the surviving offers
    /// * `events` - Sink for per-transaction and per-entry events
    ///
    /// # Returns
    /// Every transaction attempted, in execution order
    fn cross(
        &self,
        marketed: &Marketed,
        currency: &Currency,
        bids: &mut Vec<MarketBid>,
        offers: &mut Vec<MarketOffer>,
        events: &mut Vec<MarketEvent>,
    ) -> Vec<Transaction>;

    /// Get the algorithm name for logging
    fn name(&self) -> &str;

    /// Whether a bid is willing to pay what an offer asks
    ///
    /// Prices are compared at the currency's precision, the same view the
    /// book is sorted by, so noise below it never hides a crossing.
    fn prices_cross(&self, bid: &MarketBid, offer: &MarketOffer) -> bool {
        let currency = bid.currency();
        currency.significant_component(bid.unit_price())
            >= currency.significant_component(offer.unit_price())
    }
}
