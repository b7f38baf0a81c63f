// ============================================================================
// Currency Domain Model
// ============================================================================

use crate::error::{MarketError, MarketResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest supported number of significant decimals.
///
/// Price comparison scales by `10^(decimals + 1)`, which has to stay
/// representable as a `Decimal`.
pub const MAX_SIGNIFICANT_DECIMALS: u32 = 18;

/// A currency which can be used to pay for things in a market.
///
/// Two currencies are the same currency when all of their fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Currency {
    name: String,
    plural: String,
    /// Number of decimals that are significant in calculations, e.g. 2 for
    /// pounds or dollars since nothing goes below pennies or cents
    significant_decimals: u32,
    /// Display template; `%d` is replaced by the rounded amount
    format: String,
}

impl Currency {
    pub fn new(
        name: impl Into<String>,
        plural: impl Into<String>,
        significant_decimals: u32,
        format: impl Into<String>,
    ) -> MarketResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MarketError::InvalidArgument(
                "currency name cannot be empty".to_string(),
            ));
        }
        if significant_decimals > MAX_SIGNIFICANT_DECIMALS {
            return Err(MarketError::InvalidArgument(format!(
                "currency {} has {} significant decimals, at most {} are supported",
                name, significant_decimals, MAX_SIGNIFICANT_DECIMALS
            )));
        }

        Ok(Self {
            name,
            plural: plural.into(),
            significant_decimals,
            format: format.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn significant_decimals(&self) -> u32 {
        self.significant_decimals
    }

    /// Round an amount to this currency's precision, half-up.
    pub fn significant_component(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(
            self.significant_decimals,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    /// Render an amount using the display template.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = self.significant_component(amount).normalize();
        self.format.replace("%d", &rounded.to_string())
    }

    /// Scale a difference of significant components into a comparison value.
    ///
    /// The factor is `10^(decimals + 1)`, so any real difference between
    /// significant components is a multiple of 10 and a +/-1 tie-break stays
    /// distinguishable. Saturates at the i64 bounds.
    pub(crate) fn comparison_value(&self, difference: Decimal) -> i64 {
        let factor = Decimal::from_i128_with_scale(
            10_i128.pow(self.significant_decimals + 1),
            0,
        );
        let saturated = if difference.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        };

        difference
            .checked_mul(factor)
            .and_then(|scaled| scaled.trunc().to_i64())
            .unwrap_or(saturated)
    }

    /// Fail with `CurrencyMismatch` unless `other` is this currency.
    pub(crate) fn ensure_same(&self, other: &Currency) -> MarketResult<()> {
        if self == other {
            Ok(())
        } else {
            Err(MarketError::CurrencyMismatch {
                expected: self.name.clone(),
                actual: other.name.clone(),
            })
        }
    }
}

/// Anything with an objective total value in one currency.
///
/// Marketed items themselves are not valuables: their prices are set by
/// the market. Entries and transactions are, since quantity times price is
/// fixed.
pub trait Valuable {
    fn currency(&self) -> &Currency;

    fn value(&self) -> Decimal;
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn pound() -> Currency {
        Currency::new("pound", "pounds", 2, "£%d").unwrap()
    }

    #[test]
    fn test_significant_component_rounds_half_up() {
        let currency = pound();
        assert_eq!(
            currency.significant_component(Decimal::new(12345, 3)),
            Decimal::new(1235, 2)
        );
        assert_eq!(
            currency.significant_component(Decimal::new(12344, 3)),
            Decimal::new(1234, 2)
        );
        assert_eq!(
            currency.significant_component(Decimal::new(-12345, 3)),
            Decimal::new(-1235, 2)
        );
    }

    #[test]
    fn test_format() {
        let currency = pound();
        assert_eq!(currency.format(Decimal::new(12345, 3)), "£12.35");
        assert_eq!(currency.format(Decimal::from(5)), "£5");
        assert_eq!(currency.format(Decimal::new(1250, 2)), "£12.5");

        let whole = Currency::new("crown", "crowns", 0, "%d crowns").unwrap();
        assert_eq!(whole.format(Decimal::new(25, 1)), "3 crowns");
    }

    #[test]
    fn test_comparison_value_is_multiple_of_ten() {
        let currency = pound();
        assert_eq!(currency.comparison_value(Decimal::new(1, 2)), 10);
        assert_eq!(currency.comparison_value(Decimal::new(-25, 2)), -250);
        assert_eq!(currency.comparison_value(Decimal::ZERO), 0);
    }

    #[test]
    fn test_comparison_value_saturates() {
        let currency = Currency::new("mote", "motes", 18, "%d").unwrap();
        assert_eq!(currency.comparison_value(Decimal::from(1_000_000)), i64::MAX);
        assert_eq!(currency.comparison_value(Decimal::from(-1_000_000)), i64::MIN);
    }

    #[test]
    fn test_rejects_excess_precision() {
        let err = Currency::new("dust", "dust", 19, "%d").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(Currency::new("", "", 2, "%d").is_err());
    }

    #[test]
    fn test_identity_covers_every_field() {
        let a = pound();
        let b = Currency::new("pound", "pounds", 3, "£%d").unwrap();
        assert_ne!(a, b);
        assert!(a.ensure_same(&b).is_err());
        assert!(a.ensure_same(&pound()).is_ok());
    }

    quickcheck! {
        fn prop_significant_component_is_idempotent(mantissa: i64, scale: u8) -> bool {
            let currency = pound();
            let amount = Decimal::new(mantissa, u32::from(scale % 10));
            let once = currency.significant_component(amount);
            currency.significant_component(once) == once
        }

        fn prop_significant_component_stays_within_half_unit(mantissa: i64, scale: u8) -> bool {
            let currency = pound();
            let amount = Decimal::new(mantissa, u32::from(scale % 10));
            let rounded = currency.significant_component(amount);
            (rounded - amount).abs() <= Decimal::new(5, 3)
        }
    }
}
