// ============================================================================
// Bourse Library
// Single-item continuous market with price/time matching and two-legged
// settlement
// ============================================================================

//! # Bourse
//!
//! A market where bids and offers for one tradeable item meet, and matched
//! pairs settle as a goods leg and a payment leg that succeed or fail
//! together.
//!
//! ## Features
//!
//! - **Price/time priority** on significant prices, with submission time and
//!   sequence as tie-breaks
//! - **Single-use transfers** with a predict/execute split and distinct
//!   failure outcomes per leg
//! - **Rollback** of delivered goods when payment fails at commit time
//! - **Pluggable goods** through [`domain::GoodsLedger`]
//! - **Event stream** for audit and feedback through [`interfaces::EventHandler`]
//!
//! ## Example
//!
//! ```rust
//! use bourse::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let pound = Currency::new("pound", "pounds", 2, "£%d").unwrap();
//! let gold = Currency::new("gold", "gold", 0, "%dg").unwrap();
//!
//! let market = MarketBuilder::new(Marketed::Currency(gold.clone()), pound.clone())
//!     .build(Arc::new(NoOpEventHandler))
//!     .unwrap();
//!
//! let buyer = Agent::shared("buyer");
//! buyer.give(&pound, Decimal::from(100));
//! let seller = Agent::shared("seller");
//! seller.give(&gold, Decimal::from(10));
//!
//! market
//!     .add_offer(MarketOffer::new(seller.clone(), pound.clone(), Decimal::from(10), Decimal::from(5)).unwrap())
//!     .unwrap();
//! market
//!     .add_bid(MarketBid::new(buyer.clone(), pound.clone(), Decimal::from(10), Decimal::from(6)).unwrap())
//!     .unwrap();
//!
//! let transactions = market.update();
//! assert_eq!(transactions[0].state(), TransactionResult::Success);
//! assert_eq!(buyer.balance(&gold), Decimal::from(10));
//! assert_eq!(seller.balance(&pound), Decimal::from(50));
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod transfer;

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        Agent, BookSnapshot, Currency, EntryId, GoodsLedger, Holder, HolderId, MarketBid,
        MarketConfig, MarketOffer, Marketed, MarketedKind, Side, Valuable, WealthHolder,
        WealthSnapshot,
    };
    pub use crate::engine::{create_from_config, DefaultMarket, MarketBuilder, PriceTimePriority};
    pub use crate::error::{MarketError, MarketResult};
    pub use crate::interfaces::{
        ChannelEventHandler, EventHandler, LoggingEventHandler, Market, MarketEvent,
        MatchingAlgorithm, NoOpEventHandler,
    };
    pub use crate::transfer::{
        MarketedTransfer, MarketedTransferResult, Transaction, TransactionId, TransactionResult,
        WealthTransfer, WealthTransferResult,
    };
}
