//! Register-side checks before an order leaves the kitchen flow

use super::{OrderRouter, RouterResult};
use crate::orders::filter;
use shared::models::{AllowedCategories, KitchenOrder, OrderStatus, ReadyCheck};

impl OrderRouter {
    /// Detailed readiness check used by the register
    ///
    /// - unknown order, or no screen for its register: `Pending(false)`
    /// - a line product category the screen does not show: `MissingCategory`
    /// - otherwise `Pending(true)` until the order is ready
    ///
    /// A screen with no category restriction shows every product, so it
    /// never yields `MissingCategory`.
    pub fn check_ready_detailed(&self, reference: &str) -> RouterResult<ReadyCheck> {
        let Some(order) = self.storage.find_order_by_reference(reference)? else {
            return Ok(ReadyCheck::Pending(false));
        };
        let Some(screen) = self.screens.find_by_register(order.register_id)? else {
            return Ok(ReadyCheck::Pending(false));
        };

        let allowed = self.screens.allowed_categories(&screen);
        if let Some(category_id) = self.first_missing_category(&order, &allowed)? {
            let category = self.catalog.category_name(category_id);
            tracing::warn!(
                reference,
                screen_id = screen.id,
                category_id,
                category = %category,
                "Order has products outside the kitchen screen categories"
            );
            return Ok(ReadyCheck::MissingCategory { category });
        }

        Ok(ReadyCheck::Pending(order.status() != OrderStatus::Ready))
    }

    /// Whether the order still blocks the register
    ///
    /// Anything the kitchen cannot resolve (unknown order, no screen, hidden
    /// category) counts as pending.
    pub fn check_pending(&self, reference: &str) -> RouterResult<bool> {
        let Some(order) = self.storage.find_order_by_reference(reference)? else {
            return Ok(true);
        };
        let Some(screen) = self.screens.find_by_register(order.register_id)? else {
            return Ok(true);
        };

        let allowed = self.screens.allowed_categories(&screen);
        if self.first_missing_category(&order, &allowed)?.is_some() {
            return Ok(true);
        }

        Ok(order.status() != OrderStatus::Ready)
    }

    /// First offender by line creation order, lowest category id within a line
    fn first_missing_category(
        &self,
        order: &KitchenOrder,
        allowed: &AllowedCategories,
    ) -> RouterResult<Option<i64>> {
        if !allowed.is_restricted() {
            return Ok(None);
        }
        for line in self.storage.lines_for_order(order.id)? {
            let categories = self.catalog.product_categories(line.product_id);
            if let Some(category_id) = filter::first_missing_category(allowed, &categories) {
                return Ok(Some(category_id));
            }
        }
        Ok(None)
    }
}
