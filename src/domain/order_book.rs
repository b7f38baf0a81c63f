// ============================================================================
// Order Book Domain Model
// ============================================================================

use parking_lot::{RwLock, RwLockWriteGuard};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::{BookSide, Currency, Entry, EntryId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Book Side
// ============================================================================

/// One side of a market: entries keyed by identity behind their own lock.
///
/// Readers get copies. The matching pass holds the write guard for its
/// whole duration.
pub struct OrderBookSide<S: BookSide> {
    entries: RwLock<HashMap<EntryId, Entry<S>>>,
}

impl<S: BookSide> OrderBookSide<S> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn side(&self) -> Side {
        S::SIDE
    }

    /// Insert an entry. An entry with the same identity is replaced.
    pub fn add(&self, entry: Entry<S>) {
        self.entries.write().insert(entry.id(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Copy of every entry, best first
    pub fn snapshot(&self) -> Vec<Entry<S>> {
        let mut entries: Vec<Entry<S>> = self.entries.read().values().cloned().collect();
        sort_best_first(&mut entries);
        entries
    }

    /// Best `num_levels` price levels as (significant price, total quantity)
    pub fn depth(&self, currency: &Currency, num_levels: usize) -> Vec<(Decimal, Decimal)> {
        let mut levels: BTreeMap<Decimal, Decimal> = BTreeMap::new();
        for entry in self.entries.read().values() {
            let price = currency.significant_component(entry.unit_price());
            *levels.entry(price).or_insert(Decimal::ZERO) += entry.quantity();
        }

        let iter: Box<dyn Iterator<Item = (Decimal, Decimal)>> = match S::SIDE {
            Side::Bid => Box::new(levels.into_iter().rev()),
            Side::Offer => Box::new(levels.into_iter()),
        };
        iter.take(num_levels).collect()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntryId, Entry<S>>> {
        self.entries.write()
    }
}

impl<S: BookSide> Default for OrderBookSide<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort a side so the best entry comes first
pub(crate) fn sort_best_first<S: BookSide>(entries: &mut [Entry<S>]) {
    entries.sort_by(|a, b| a.cmp_best_first(b));
}

// ============================================================================
// Book Snapshot
// ============================================================================

/// Immutable aggregated view of a market's book
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookSnapshot {
    pub label: String,
    /// Bid levels (price, quantity), highest price first
    pub bids: Vec<(Decimal, Decimal)>,
    /// Offer levels (price, quantity), lowest price first
    pub offers: Vec<(Decimal, Decimal)>,
    /// Best offer minus best bid; negative while the book is crossed
    pub spread: Option<Decimal>,
    pub mid_price: Option<Decimal>,
}

impl BookSnapshot {
    pub fn with_depth(
        label: String,
        bids: Vec<(Decimal, Decimal)>,
        offers: Vec<(Decimal, Decimal)>,
    ) -> Self {
        let (spread, mid_price) = match (bids.first(), offers.first()) {
            (Some((bid, _)), Some((offer, _))) => {
                (Some(offer - bid), Some((bid + offer) / Decimal::from(2)))
            },
            _ => (None, None),
        };

        Self {
            label,
            bids,
            offers,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_offer(&self) -> Option<Decimal> {
        self.offers.first().map(|(price, _)| *price)
    }

    pub fn is_crossed(&self) -> bool {
        self.spread.is_some_and(|spread| spread < Decimal::ZERO)
    }

    pub fn total_bid_quantity(&self) -> Decimal {
        self.bids.iter().map(|(_, qty)| qty).sum()
    }

    pub fn total_offer_quantity(&self) -> Decimal {
        self.offers.iter().map(|(_, qty)| qty).sum()
    }
}
