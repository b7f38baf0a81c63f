// ============================================================================
// Wealth Holder Domain Model
// ============================================================================

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::Currency;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HolderId(Uuid);

impl HolderId {
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

impl Default for HolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time copy of a holder's balances. Never reflects later mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WealthSnapshot {
    balances: HashMap<Currency, Decimal>,
}

impl WealthSnapshot {
    pub fn new(balances: HashMap<Currency, Decimal>) -> Self {
        Self { balances }
    }

    /// Balance held in `currency`; zero when the holder never held any
    pub fn amount(&self, currency: &Currency) -> Decimal {
        self.balances.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.balances.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Anything that holds balances of one or more currencies.
///
/// Implementations guard each holder's state independently; the market
/// never takes a global lock over holders.
pub trait WealthHolder: Send + Sync + fmt::Debug {
    fn id(&self) -> HolderId;

    fn current_wealth(&self) -> WealthSnapshot;

    /// Credit `amount`. A negative amount is a debit of its absolute value.
    fn give(&self, currency: &Currency, amount: Decimal) -> bool;

    /// Debit `amount` if, and only if, enough is held. Check and debit happen
    /// under the holder's guard. A negative amount is a credit.
    fn take(&self, currency: &Currency, amount: Decimal) -> bool;

    fn has(&self, currency: &Currency, amount: Decimal) -> bool;
}

/// Shared handle to a wealth holder
pub type Holder = Arc<dyn WealthHolder>;

/// In-memory participant in a market.
#[derive(Debug)]
pub struct Agent {
    id: HolderId,
    name: String,
    wealth: Mutex<HashMap<Currency, Decimal>>,
}

impl Agent {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_wealth(HolderId::new(), name, HashMap::new())
    }

    pub fn with_wealth(
        id: HolderId,
        name: impl Into<String>,
        wealth: HashMap<Currency, Decimal>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            wealth: Mutex::new(wealth),
        }
    }

    /// Convenience for building a shared holder
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self, currency: &Currency) -> Decimal {
        self.wealth
            .lock()
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl WealthHolder for Agent {
    fn id(&self) -> HolderId {
        self.id
    }

    fn current_wealth(&self) -> WealthSnapshot {
        WealthSnapshot::new(self.wealth.lock().clone())
    }

    fn give(&self, currency: &Currency, amount: Decimal) -> bool {
        if amount.is_sign_negative() && !amount.is_zero() {
            return self.take(currency, -amount);
        }

        let mut wealth = self.wealth.lock();
        let balance = wealth.entry(currency.clone()).or_insert(Decimal::ZERO);
        match balance.checked_add(amount) {
            Some(total) => {
                *balance = total;
                true
            },
            None => false,
        }
    }

    fn take(&self, currency: &Currency, amount: Decimal) -> bool {
        if amount.is_sign_negative() && !amount.is_zero() {
            return self.give(currency, -amount);
        }

        let mut wealth = self.wealth.lock();
        match wealth.get_mut(currency) {
            Some(current) if *current >= amount => {
                *current -= amount;
                true
            },
            _ => false,
        }
    }

    fn has(&self, currency: &Currency, amount: Decimal) -> bool {
        self.wealth
            .lock()
            .get(currency)
            .is_some_and(|current| *current >= amount)
    }
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Agent {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pound() -> Currency {
        Currency::new("pound", "pounds", 2, "£%d").unwrap()
    }

    #[test]
    fn test_give_and_take() {
        let agent = Agent::new("alice");
        let currency = pound();

        assert!(agent.give(&currency, Decimal::from(100)));
        assert!(agent.has(&currency, Decimal::from(100)));
        assert!(!agent.has(&currency, Decimal::from(101)));

        assert!(agent.take(&currency, Decimal::from(40)));
        assert_eq!(agent.balance(&currency), Decimal::from(60));

        // Overdraw refused, balance untouched
        assert!(!agent.take(&currency, Decimal::from(61)));
        assert_eq!(agent.balance(&currency), Decimal::from(60));
    }

    #[test]
    fn test_negative_amounts_flip_direction() {
        let agent = Agent::new("bob");
        let currency = pound();

        assert!(agent.take(&currency, Decimal::from(-25)));
        assert_eq!(agent.balance(&currency), Decimal::from(25));

        assert!(agent.give(&currency, Decimal::from(-5)));
        assert_eq!(agent.balance(&currency), Decimal::from(20));

        assert!(!agent.give(&currency, Decimal::from(-50)));
        assert_eq!(agent.balance(&currency), Decimal::from(20));
    }

    #[test]
    fn test_credit_past_decimal_range_is_refused() {
        let agent = Agent::new("erin");
        let currency = pound();

        assert!(agent.give(&currency, Decimal::MAX));
        assert!(!agent.give(&currency, Decimal::ONE));
        assert_eq!(agent.balance(&currency), Decimal::MAX);
    }

    #[test]
    fn test_take_from_unknown_currency_fails() {
        let agent = Agent::new("carol");
        assert!(!agent.take(&pound(), Decimal::ONE));
        assert!(!agent.has(&pound(), Decimal::ONE));
        // A currency never held is not held even at zero
        assert!(!agent.has(&pound(), Decimal::ZERO));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let agent = Agent::new("dave");
        let currency = pound();
        agent.give(&currency, Decimal::from(10));

        let snapshot = agent.current_wealth();
        agent.give(&currency, Decimal::from(5));

        assert_eq!(snapshot.amount(&currency), Decimal::from(10));
        assert_eq!(agent.current_wealth().amount(&currency), Decimal::from(15));
    }

    #[test]
    fn test_concurrent_debits_never_overdraw() {
        let agent = Arc::new(Agent::new("erin"));
        let currency = pound();
        agent.give(&currency, Decimal::from(100));

        let successes: usize = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let agent = Arc::clone(&agent);
                    let currency = currency.clone();
                    scope.spawn(move |_| {
                        (0..50)
                            .filter(|_| agent.take(&currency, Decimal::ONE))
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        })
        .unwrap();

        assert_eq!(successes, 100);
        assert_eq!(agent.balance(&currency), Decimal::ZERO);
    }
}
