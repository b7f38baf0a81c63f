// ============================================================================
// Test Support
// In-memory goods ledger used by unit and integration tests
// ============================================================================

use crate::domain::{GoodsLedger, Holder, HolderId};
use crate::transfer::MarketedTransferResult;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Widgets held per holder, with an optional list of holders who refuse
/// delivery.
#[derive(Debug, Default)]
pub(crate) struct WidgetLedger {
    stock: Mutex<HashMap<HolderId, Decimal>>,
    refused: Mutex<HashSet<HolderId>>,
}

impl WidgetLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stock(&self, holder: &Holder, quantity: Decimal) {
        *self.stock.lock().entry(holder.id()).or_insert(Decimal::ZERO) += quantity;
    }

    pub(crate) fn held_by(&self, holder: &Holder) -> Decimal {
        self.stock
            .lock()
            .get(&holder.id())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn refuse_delivery_to(&self, holder: &Holder) {
        self.refused.lock().insert(holder.id());
    }

    fn move_widgets(&self, from: &Holder, to: &Holder, quantity: Decimal) -> bool {
        let mut stock = self.stock.lock();
        let available = stock.get(&from.id()).copied().unwrap_or(Decimal::ZERO);
        if available < quantity {
            return false;
        }
        stock.insert(from.id(), available - quantity);
        *stock.entry(to.id()).or_insert(Decimal::ZERO) += quantity;
        true
    }
}

impl GoodsLedger for WidgetLedger {
    fn name(&self) -> &str {
        "widget"
    }

    fn predict(
        &self,
        sender: &Holder,
        recipient: &Holder,
        quantity: Decimal,
    ) -> MarketedTransferResult {
        if self.refused.lock().contains(&recipient.id()) {
            MarketedTransferResult::RecipientCannotReceive
        } else if !self.can_supply(sender, quantity) {
            MarketedTransferResult::SenderNotEnough
        } else {
            MarketedTransferResult::Success
        }
    }

    fn transfer(
        &self,
        sender: &Holder,
        recipient: &Holder,
        quantity: Decimal,
    ) -> MarketedTransferResult {
        match self.predict(sender, recipient, quantity) {
            MarketedTransferResult::Success => {
                if self.move_widgets(sender, recipient, quantity) {
                    MarketedTransferResult::Success
                } else {
                    MarketedTransferResult::Error
                }
            },
            other => other,
        }
    }

    fn rollback(&self, sender: &Holder, recipient: &Holder, quantity: Decimal) -> bool {
        self.move_widgets(recipient, sender, quantity)
    }

    fn can_supply(&self, holder: &Holder, quantity: Decimal) -> bool {
        self.held_by(holder) >= quantity
    }
}
