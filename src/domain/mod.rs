// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod currency;
pub mod entry;
pub mod marketed;
pub mod order_book;
pub mod wealth;

pub use config::MarketConfig;
pub use currency::{Currency, Valuable, MAX_SIGNIFICANT_DECIMALS};
pub use entry::{Bid, BookSide, Entry, EntryId, MarketBid, MarketOffer, Offer, Side};
pub use marketed::{GoodsLedger, Marketed, MarketedKind};
pub use order_book::{BookSnapshot, OrderBookSide};
pub use wealth::{Agent, Holder, HolderId, WealthHolder, WealthSnapshot};
