// ============================================================================
// Market Interface
// ============================================================================

use crate::domain::{Currency, MarketBid, MarketOffer, Marketed};
use crate::error::MarketResult;
use crate::transfer::Transaction;

/// A place where bids and offers for one item meet.
///
/// Submissions and queries may come from many threads at once. `update`
/// is exclusive per market: it holds both sides of the book for the whole
/// matching pass.
pub trait Market: Send + Sync {
    fn marketed(&self) -> &Marketed;

    fn transaction_currency(&self) -> &Currency;

    /// # Errors
    /// `CurrencyMismatch` if the bid is not priced in the transaction
    /// currency. The book is unchanged in that case.
    fn add_bid(&self, bid: MarketBid) -> MarketResult<()>;

    /// # Errors
    /// `CurrencyMismatch` if the offer is not priced in the transaction
    /// currency. The book is unchanged in that case.
    fn add_offer(&self, offer: MarketOffer) -> MarketResult<()>;

    /// Copy of the standing bids, best first
    fn bids(&self) -> Vec<MarketBid>;

    /// Copy of the standing offers, best first
    fn offers(&self) -> Vec<MarketOffer>;

    /// Run one matching pass and return every transaction attempted
    fn update(&self) -> Vec<Transaction>;
}
