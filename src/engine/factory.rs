// ============================================================================
// Market Factory
// Creates markets with proper configuration
// ============================================================================

use crate::domain::{Currency, MarketConfig, Marketed};
use crate::engine::{DefaultMarket, PriceTimePriority};
use crate::error::MarketResult;
use crate::interfaces::EventHandler;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a market from configuration
///
/// # Arguments
/// * `config` - Market configuration
/// * `event_handler` - Event handler for book and settlement events
///
/// # Errors
/// `InvalidConfig` when the configuration does not validate
///
/// # Example
/// ```
/// use bourse::prelude::*;
/// use std::sync::Arc;
///
/// let gold = Currency::new("gold", "gold", 0, "%dg").unwrap();
/// let pound = Currency::new("pound", "pounds", 2, "£%d").unwrap();
/// let config = MarketConfig::currency_pair(gold, pound);
/// let market = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(market.label(), "gold/pound");
/// ```
pub fn create_from_config(
    config: MarketConfig,
    event_handler: Arc<dyn EventHandler>,
) -> MarketResult<DefaultMarket> {
    config.validate()?;

    tracing::debug!(
        market = %config.label,
        kind = ?config.marketed.kind(),
        "creating market"
    );

    Ok(DefaultMarket::new(
        config,
        Box::new(PriceTimePriority::new()),
        event_handler,
    ))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating markets with fluent API
///
/// # Example
/// ```
/// use bourse::prelude::*;
/// use std::sync::Arc;
///
/// let gold = Currency::new("gold", "gold", 0, "%dg").unwrap();
/// let pound = Currency::new("pound", "pounds", 2, "£%d").unwrap();
/// let market = MarketBuilder::new(Marketed::Currency(gold), pound)
///     .label("bullion")
///     .evict_undeliverable_offers(true)
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(market.label(), "bullion");
/// ```
pub struct MarketBuilder {
    config: MarketConfig,
}

impl MarketBuilder {
    /// Create a new builder for `marketed` priced in `transaction_currency`
    pub fn new(marketed: Marketed, transaction_currency: Currency) -> Self {
        Self {
            config: MarketConfig::new(marketed, transaction_currency),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: MarketConfig) -> Self {
        Self { config }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// Remove bids the bidder cannot cover before each pass (default on)
    pub fn evict_insolvent_bids(mut self, enabled: bool) -> Self {
        self.config.evict_insolvent_bids = enabled;
        self
    }

    /// Remove offers the seller cannot deliver before each pass (default off)
    pub fn evict_undeliverable_offers(mut self, enabled: bool) -> Self {
        self.config.evict_undeliverable_offers = enabled;
        self
    }

    /// Build the market
    pub fn build(self, event_handler: Arc<dyn EventHandler>) -> MarketResult<DefaultMarket> {
        create_from_config(self.config, event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &MarketConfig {
        &self.config
    }
}
