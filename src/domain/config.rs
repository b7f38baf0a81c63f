// ============================================================================
// Market Configuration
// What a market trades, in which currency, and its book maintenance policy
// ============================================================================

use crate::error::{MarketError, MarketResult};

use super::{Currency, Marketed};

/// Configuration for creating a market
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Human readable name used in logs and snapshots
    pub label: String,

    /// The item bought and sold
    pub marketed: Marketed,

    /// Currency every bid and offer is priced in
    pub transaction_currency: Currency,

    /// Remove bids whose bidder cannot cover the full bid value before
    /// each matching pass
    pub evict_insolvent_bids: bool,

    /// Remove offers whose seller cannot currently supply the offered
    /// quantity before each matching pass
    pub evict_undeliverable_offers: bool,
}

impl MarketConfig {
    /// Create a configuration with the default book maintenance policy:
    /// insolvent bids are evicted, offers are left alone.
    pub fn new(marketed: Marketed, transaction_currency: Currency) -> Self {
        let label = format!("{}/{}", marketed.name(), transaction_currency.name());
        Self {
            label,
            marketed,
            transaction_currency,
            evict_insolvent_bids: true,
            evict_undeliverable_offers: false,
        }
    }

    /// One currency traded against another
    pub fn currency_pair(base: Currency, quote: Currency) -> Self {
        Self::new(Marketed::Currency(base), quote)
    }

    /// Builder method: Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder method: Toggle the insolvent bid pre-pass
    pub fn with_bid_eviction(mut self, enabled: bool) -> Self {
        self.evict_insolvent_bids = enabled;
        self
    }

    /// Builder method: Toggle the undeliverable offer pre-pass
    pub fn with_offer_eviction(mut self, enabled: bool) -> Self {
        self.evict_undeliverable_offers = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> MarketResult<()> {
        if self.label.trim().is_empty() {
            return Err(MarketError::InvalidConfig(
                "market label cannot be empty".to_string(),
            ));
        }

        if let Marketed::Currency(currency) = &self.marketed {
            if currency == &self.transaction_currency {
                return Err(MarketError::InvalidConfig(format!(
                    "cannot trade {} against itself",
                    currency
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pound() -> Currency {
        Currency::new("pound", "pounds", 2, "£%d").unwrap()
    }

    fn gold() -> Currency {
        Currency::new("gold", "gold", 0, "%dg").unwrap()
    }

    #[test]
    fn test_config_creation() {
        let config = MarketConfig::currency_pair(gold(), pound());

        assert_eq!(config.label, "gold/pound");
        assert_eq!(config.transaction_currency, pound());
        assert!(config.evict_insolvent_bids);
        assert!(!config.evict_undeliverable_offers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MarketConfig::currency_pair(gold(), pound())
            .with_label("bullion")
            .with_bid_eviction(false)
            .with_offer_eviction(true);

        assert_eq!(config.label, "bullion");
        assert!(!config.evict_insolvent_bids);
        assert!(config.evict_undeliverable_offers);
    }

    #[test]
    fn test_validation() {
        let unlabelled = MarketConfig::currency_pair(gold(), pound()).with_label("  ");
        assert!(matches!(
            unlabelled.validate(),
            Err(MarketError::InvalidConfig(_))
        ));

        let self_pair = MarketConfig::currency_pair(pound(), pound());
        assert!(matches!(
            self_pair.validate(),
            Err(MarketError::InvalidConfig(_))
        ));
    }
}
