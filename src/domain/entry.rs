// ============================================================================
// Market Entry Domain Model
// Bids and offers resting in a market, and the price/time ordering rule
// ============================================================================

use crate::error::{MarketError, MarketResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use uuid::Uuid;

use super::{Currency, Holder, Valuable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process-wide submission counter, breaks ties inside one clock tick
static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Bid,
    Offer,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Offer => write!(f, "offer"),
        }
    }
}

// ============================================================================
// Book Sides
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Type-level marker for which side of the book an entry rests on.
pub trait BookSide: sealed::Sealed + fmt::Debug + Send + Sync + 'static {
    const SIDE: Side;

    /// Positive when `own` is the better price for this side
    fn price_advantage(own: Decimal, other: Decimal) -> Decimal;
}

/// Buy side: a higher unit price is better
#[derive(Debug)]
pub enum Bid {}

/// Sell side: a lower unit price is better
#[derive(Debug)]
pub enum Offer {}

impl sealed::Sealed for Bid {}
impl sealed::Sealed for Offer {}

impl BookSide for Bid {
    const SIDE: Side = Side::Bid;

    fn price_advantage(own: Decimal, other: Decimal) -> Decimal {
        own - other
    }
}

impl BookSide for Offer {
    const SIDE: Side = Side::Offer;

    fn price_advantage(own: Decimal, other: Decimal) -> Decimal {
        other - own
    }
}

// ============================================================================
// Entry
// ============================================================================

/// A standing request to trade a quantity of the market's item at a limit
/// unit price.
///
/// Entries are immutable. A partial fill produces a replacement through
/// [`Entry::remainder_after`] which keeps the identity, price, submission
/// time and sequence, so priority never changes as an entry shrinks.
/// Equality and hashing use the identity only.
pub struct Entry<S: BookSide> {
    id: EntryId,
    holder: Holder,
    currency: Currency,
    quantity: Decimal,
    unit_price: Decimal,
    submitted_at: DateTime<Utc>,
    sequence: u64,
    _side: PhantomData<S>,
}

/// A bid made to buy a quantity of something at a unit price
pub type MarketBid = Entry<Bid>;

/// An offer made to sell a quantity of something at a unit price
pub type MarketOffer = Entry<Offer>;

impl<S: BookSide> Entry<S> {
    /// Create a fresh entry with a new identity and the current time.
    ///
    /// # Errors
    /// `InvalidArgument` if quantity is not positive, the unit price is
    /// negative, or their product does not fit a `Decimal`.
    pub fn new(
        holder: Holder,
        currency: Currency,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> MarketResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(MarketError::InvalidArgument(format!(
                "{} quantity must be positive, got {}",
                S::SIDE,
                quantity
            )));
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(MarketError::InvalidArgument(format!(
                "{} unit price cannot be negative, got {}",
                S::SIDE,
                unit_price
            )));
        }

        if quantity.checked_mul(unit_price).is_none() {
            return Err(MarketError::InvalidArgument(format!(
                "{} value overflows: {} x {}",
                S::SIDE,
                quantity,
                unit_price
            )));
        }

        Ok(Self {
            id: EntryId::new(),
            holder,
            currency,
            quantity,
            unit_price,
            submitted_at: Utc::now(),
            sequence: SUBMISSION_SEQUENCE.fetch_add(1, AtomicOrdering::AcqRel),
            _side: PhantomData,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn side(&self) -> Side {
        S::SIDE
    }

    pub fn holder(&self) -> &Holder {
        &self.holder
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// What is left after `filled` units were traded, or `None` when
    /// nothing is left.
    pub fn remainder_after(&self, filled: Decimal) -> Option<Self> {
        let remaining = self.quantity - filled;
        if remaining <= Decimal::ZERO {
            return None;
        }

        Some(Self {
            quantity: remaining,
            ..self.clone()
        })
    }

    /// Price-only comparison value: positive when this entry's significant
    /// price is better. Real differences are multiples of 10.
    pub fn price_priority(&self, other: &Self) -> MarketResult<i64> {
        self.currency.ensure_same(&other.currency)?;
        Ok(self.price_priority_unchecked(other))
    }

    /// Full price/time comparison value: positive when this entry is better.
    ///
    /// Equal significant prices are broken by submission time (earlier
    /// wins, +/-1), then by submission sequence. The same identity always
    /// compares as 0.
    ///
    /// # Errors
    /// `CurrencyMismatch` when the entries use different currencies.
    pub fn priority(&self, other: &Self) -> MarketResult<i64> {
        self.currency.ensure_same(&other.currency)?;
        Ok(self.priority_unchecked(other))
    }

    /// Ordering for sorting a side best-first.
    ///
    /// Callers guarantee both entries share a currency; the book enforces
    /// that on insertion.
    pub(crate) fn cmp_best_first(&self, other: &Self) -> Ordering {
        0.cmp(&self.priority_unchecked(other))
    }

    fn price_priority_unchecked(&self, other: &Self) -> i64 {
        let own = self.currency.significant_component(self.unit_price);
        let theirs = other.currency.significant_component(other.unit_price);
        self.currency
            .comparison_value(S::price_advantage(own, theirs))
    }

    fn priority_unchecked(&self, other: &Self) -> i64 {
        if self.id == other.id {
            return 0;
        }

        let comparison = self.price_priority_unchecked(other);
        if comparison != 0 {
            return comparison;
        }

        match (self.submitted_at, self.sequence).cmp(&(other.submitted_at, other.sequence)) {
            Ordering::Less => 1,
            Ordering::Greater => -1,
            Ordering::Equal => 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_submission_time(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}

impl Entry<Bid> {
    pub fn bidder(&self) -> &Holder {
        &self.holder
    }
}

impl Entry<Offer> {
    pub fn seller(&self) -> &Holder {
        &self.holder
    }
}

impl<S: BookSide> Valuable for Entry<S> {
    fn currency(&self) -> &Currency {
        &self.currency
    }

    fn value(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

impl<S: BookSide> Clone for Entry<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            holder: Arc::clone(&self.holder),
            currency: self.currency.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            submitted_at: self.submitted_at,
            sequence: self.sequence,
            _side: PhantomData,
        }
    }
}

impl<S: BookSide> fmt::Debug for Entry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("side", &S::SIDE)
            .field("id", &self.id)
            .field("holder", &self.holder.id())
            .field("currency", &self.currency.name())
            .field("quantity", &self.quantity)
            .field("unit_price", &self.unit_price)
            .field("submitted_at", &self.submitted_at)
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl<S: BookSide> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<S: BookSide> Eq for Entry<S> {}

impl<S: BookSide> Hash for Entry<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
