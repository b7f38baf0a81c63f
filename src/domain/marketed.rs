// ============================================================================
// Marketed Item Domain Model
// The thing a market trades, and the factory for its goods leg
// ============================================================================

use crate::transfer::{MarketedTransfer, MarketedTransferResult};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

use super::{Currency, Holder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarketedKind {
    Currency,
    Product,
}

/// Custody of a non-currency tradeable.
///
/// Implementations decide who holds how much of the item and whether a
/// holder can take delivery. The single-use guard around each transfer is
/// provided by [`MarketedTransfer`], so a ledger only moves quantities.
pub trait GoodsLedger: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Outcome `transfer` would have right now, without moving anything
    fn predict(&self, sender: &Holder, recipient: &Holder, quantity: Decimal)
        -> MarketedTransferResult;

    fn transfer(&self, sender: &Holder, recipient: &Holder, quantity: Decimal)
        -> MarketedTransferResult;

    /// Undo a successful `transfer`. Returns false when that is no longer
    /// possible.
    fn rollback(&self, sender: &Holder, recipient: &Holder, quantity: Decimal) -> bool;

    /// Whether `holder` could currently supply `quantity`
    fn can_supply(&self, holder: &Holder, quantity: Decimal) -> bool;
}

/// Something which can be bought and sold in a market.
#[derive(Debug, Clone)]
pub enum Marketed {
    /// A currency traded against another currency
    Currency(Currency),
    /// Any other tradeable, backed by a pluggable ledger
    Goods(Arc<dyn GoodsLedger>),
}

impl Marketed {
    pub fn name(&self) -> &str {
        match self {
            Marketed::Currency(currency) => currency.name(),
            Marketed::Goods(ledger) => ledger.name(),
        }
    }

    pub fn kind(&self) -> MarketedKind {
        match self {
            Marketed::Currency(_) => MarketedKind::Currency,
            Marketed::Goods(_) => MarketedKind::Product,
        }
    }

    /// Build the goods leg moving `quantity` from `sender` to `recipient`
    pub fn transfer_for(
        &self,
        sender: Holder,
        recipient: Holder,
        quantity: Decimal,
    ) -> MarketedTransfer {
        MarketedTransfer::new(sender, recipient, self.clone(), quantity)
    }

    /// Whether `holder` currently holds enough of the item to deliver
    pub fn can_supply(&self, holder: &Holder, quantity: Decimal) -> bool {
        match self {
            Marketed::Currency(currency) => holder.has(currency, quantity),
            Marketed::Goods(ledger) => ledger.can_supply(holder, quantity),
        }
    }
}

impl fmt::Display for Marketed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
