// ============================================================================
// Engine Module
// Contains the market and its crossing algorithm
// ============================================================================

mod market;
mod price_time;

pub mod factory;

pub use factory::{create_from_config, MarketBuilder};
pub use market::DefaultMarket;
pub use price_time::PriceTimePriority;
