//! OrderRouter - kitchen order reconciliation and routing
//!
//! # Flow
//!
//! ```text
//! register batch ──▶ ingest ──▶ update existing / create new (redb txn)
//!                                  │
//!                                  ├──▶ OrderNotifier (order_created)
//!                                  ▼
//! screen query ──▶ get_details ──▶ ScreenRegistry allow-list ──▶ filtered lines
//! ```
//!
//! Every write runs inside one redb write transaction and is followed by a
//! notification, so connected screens reload.

mod diagnostics;
mod error;

pub use error::*;

use super::filter;
use crate::db::KitchenStorage;
use crate::screens::ScreenRegistry;
use crate::services::{CatalogService, OrderNotifier};
use redb::WriteTransaction;
use shared::message::{ORDER_CREATED_TOPIC, OrderNotification};
use shared::models::{
    KitchenDetails, KitchenOrder, KitchenOrderLine, LineSnapshot, LineView, OrderSnapshot,
    OrderStatus, OrderUpdate, OrderView, PosState, ProductDetail, UNNAMED_ORDER,
};
use shared::util::{local_hour_minutes, now_millis};
use std::collections::HashSet;
use std::sync::Arc;

/// Sequence code for order names assigned on payment
pub const ORDER_SEQUENCE_CODE: &str = "pos.order";

/// Sequence code for order line names
pub const LINE_SEQUENCE_CODE: &str = "pos.order.line";

/// Outcome of reconciling one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reconciled {
    Created,
    Updated,
}

/// Order router
#[derive(Clone)]
pub struct OrderRouter {
    storage: KitchenStorage,
    screens: ScreenRegistry,
    catalog: CatalogService,
    notifier: Arc<dyn OrderNotifier>,
}

impl std::fmt::Debug for OrderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRouter")
            .field("storage", &self.storage)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl OrderRouter {
    pub fn new(
        storage: KitchenStorage,
        screens: ScreenRegistry,
        catalog: CatalogService,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            storage,
            screens,
            catalog,
            notifier,
        }
    }

    fn notify(&self) {
        self.notifier
            .notify(ORDER_CREATED_TOPIC, &OrderNotification::order_created());
    }

    // ========== Ingest ==========

    /// Reconcile a batch sent by a register, then return what its screen shows
    ///
    /// Existing references are restarted (cooking, draft) and receive the new
    /// lines; unknown references are created. Bad entries are logged and
    /// skipped, and any failure degrades to empty details.
    pub fn ingest(&self, register_id: i64, batch: &[OrderSnapshot]) -> KitchenDetails {
        let mut created: HashSet<&str> = HashSet::new();
        let mut written = false;

        for snapshot in batch {
            if let Err(e) = validate(snapshot) {
                tracing::warn!(register_id, error = %e, "Skipping order snapshot");
                continue;
            }
            if created.contains(snapshot.reference.as_str()) {
                tracing::info!(
                    register_id,
                    reference = %snapshot.reference,
                    "Duplicate reference in batch, skipped"
                );
                continue;
            }

            match self.reconcile(register_id, snapshot) {
                Ok(Reconciled::Created) => {
                    created.insert(snapshot.reference.as_str());
                    written = true;
                }
                Ok(Reconciled::Updated) => written = true,
                Err(e) => tracing::error!(
                    register_id,
                    reference = %snapshot.reference,
                    error = %e,
                    "Failed to reconcile order snapshot"
                ),
            }
        }

        if written {
            self.notify();
        }

        self.get_details(register_id)
    }

    /// What the register's kitchen screen currently shows
    pub fn get_details(&self, register_id: i64) -> KitchenDetails {
        match self.try_get_details(register_id) {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(register_id, error = %e, "Failed to load kitchen details");
                KitchenDetails::default()
            }
        }
    }

    fn try_get_details(&self, register_id: i64) -> RouterResult<KitchenDetails> {
        let Some(screen) = self.screens.find_by_register(register_id)? else {
            tracing::debug!(register_id, "No active kitchen screen for register");
            return Ok(KitchenDetails::default());
        };
        let allowed = self.screens.allowed_categories(&screen);

        let mut orders: Vec<KitchenOrder> = self
            .storage
            .orders_for_register(register_id)?
            .into_iter()
            .filter(|o| o.is_cooking)
            .collect();
        orders.sort_by(|a, b| {
            b.date_order
                .cmp(&a.date_order)
                .then_with(|| b.id.cmp(&a.id))
        });

        let mut details = KitchenDetails::default();
        for order in &orders {
            let lines = self.storage.lines_for_order(order.id)?;
            details
                .orders
                .push(OrderView::from_order(order, lines.iter().map(|l| l.id).collect()));

            for line in lines.iter().filter(|l| l.is_cooking) {
                let categories = self.catalog.product_categories(line.product_id);
                if filter::line_visible(&allowed, &categories) {
                    details.lines.push(LineView::from_line(
                        line,
                        order,
                        self.catalog.product_name(line.product_id),
                    ));
                }
            }
        }
        details.lines.sort_by_key(|l| l.id);

        tracing::debug!(
            register_id,
            screen_id = screen.id,
            orders = details.orders.len(),
            lines = details.lines.len(),
            "Kitchen details resolved"
        );
        Ok(details)
    }

    fn reconcile(&self, register_id: i64, snapshot: &OrderSnapshot) -> RouterResult<Reconciled> {
        let txn = self.storage.begin_write()?;

        let outcome = match self
            .storage
            .find_order_by_reference_txn(&txn, &snapshot.reference)?
        {
            Some(mut order) => {
                order.floor = snapshot.floor.clone().unwrap_or_default();
                order.hour = snapshot.hour.clone().unwrap_or_default();
                order.minutes = snapshot.minutes.clone().unwrap_or_default();
                order.is_cooking = true;
                // Re-submission restarts the ticket, waiting included
                order.order_status = Some(OrderStatus::Draft);
                order.updated_at = now_millis();
                self.storage.store_order(&txn, &order)?;

                for line in &snapshot.lines {
                    self.insert_line(&txn, order.id, line, true)?;
                }

                tracing::info!(
                    order_id = order.id,
                    reference = %order.reference,
                    lines = snapshot.lines.len(),
                    "Kitchen order re-submitted"
                );
                Reconciled::Updated
            }
            None => {
                let order = self.insert_order(&txn, register_id, snapshot, true)?;
                tracing::info!(
                    order_id = order.id,
                    reference = %order.reference,
                    register_id,
                    "Kitchen order created"
                );
                Reconciled::Created
            }
        };

        txn.commit()?;
        Ok(outcome)
    }

    // ========== Creation ==========

    /// Standard creation path for orders pushed by the register
    ///
    /// References already stored, or repeated within the batch, are skipped.
    /// Returns the orders actually created.
    pub fn create_orders(&self, batch: &[OrderSnapshot]) -> Vec<KitchenOrder> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut created = Vec::new();

        for snapshot in batch {
            if let Err(e) = validate(snapshot) {
                tracing::warn!(error = %e, "Skipping order snapshot");
                continue;
            }
            let Some(register_id) = snapshot.register_id else {
                tracing::warn!(reference = %snapshot.reference, "Order snapshot without register, skipped");
                continue;
            };
            if !seen.insert(snapshot.reference.as_str()) {
                tracing::info!(reference = %snapshot.reference, "Duplicate reference in batch, skipped");
                continue;
            }

            match self.create_one(register_id, snapshot) {
                Ok(Some(order)) => created.push(order),
                Ok(None) => tracing::info!(
                    reference = %snapshot.reference,
                    "Order reference already exists, skipped"
                ),
                Err(e) => tracing::error!(
                    reference = %snapshot.reference,
                    error = %e,
                    "Failed to create kitchen order"
                ),
            }
        }

        if !created.is_empty() {
            tracing::info!(count = created.len(), "Kitchen orders created");
            self.notify();
        }
        created
    }

    fn create_one(
        &self,
        register_id: i64,
        snapshot: &OrderSnapshot,
    ) -> RouterResult<Option<KitchenOrder>> {
        let txn = self.storage.begin_write()?;
        if self
            .storage
            .find_order_by_reference_txn(&txn, &snapshot.reference)?
            .is_some()
        {
            return Ok(None);
        }
        let order = self.insert_order(&txn, register_id, snapshot, false)?;
        txn.commit()?;
        Ok(Some(order))
    }

    fn insert_order(
        &self,
        txn: &WriteTransaction,
        register_id: i64,
        snapshot: &OrderSnapshot,
        is_cooking: bool,
    ) -> RouterResult<KitchenOrder> {
        let now = now_millis();
        let (hour, minutes) = match (&snapshot.hour, &snapshot.minutes) {
            (Some(h), Some(m)) => (h.clone(), m.clone()),
            (h, m) => {
                let (local_h, local_m) = local_hour_minutes();
                (
                    h.clone().unwrap_or(local_h),
                    m.clone().unwrap_or(local_m),
                )
            }
        };

        let order = KitchenOrder {
            id: self.storage.next_order_id(txn)?,
            reference: snapshot.reference.clone(),
            register_id,
            name: UNNAMED_ORDER.to_string(),
            order_ref: None,
            order_status: Some(OrderStatus::Draft),
            is_cooking,
            hour,
            minutes,
            floor: snapshot.floor.clone().unwrap_or_default(),
            customer_id: snapshot.customer_id,
            state: PosState::Draft,
            date_order: snapshot.date_order.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        self.storage.store_order(txn, &order)?;

        for line in &snapshot.lines {
            self.insert_line(txn, order.id, line, is_cooking)?;
        }
        Ok(order)
    }

    fn insert_line(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
        snapshot: &LineSnapshot,
        is_cooking: bool,
    ) -> RouterResult<KitchenOrderLine> {
        let product_id = snapshot
            .product_id
            .ok_or_else(|| RouterError::Malformed("line without product".to_string()))?;

        let name = match &snapshot.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let n = self.storage.next_sequence(txn, LINE_SEQUENCE_CODE)?;
                format!("L{:05}", n)
            }
        };

        let line = KitchenOrderLine {
            id: self.storage.next_line_id(txn)?,
            order_id,
            product_id,
            qty: snapshot.qty,
            name,
            note: snapshot.note.clone(),
            order_status: Some(OrderStatus::Draft),
            is_cooking,
            created_at: now_millis(),
        };
        self.storage.store_line(txn, &line)?;
        Ok(line)
    }

    // ========== Status ==========

    /// Kitchen accepted the order
    pub fn progress_to_waiting(&self, reference: &str) -> RouterResult<bool> {
        self.transition(reference, OrderStatus::Waiting, false)
    }

    /// Order cancelled; lines already served stay ready
    pub fn progress_to_cancel(&self, reference: &str) -> RouterResult<bool> {
        self.transition(reference, OrderStatus::Cancel, false)
    }

    /// Whole order served, every line included
    pub fn progress_to_ready(&self, reference: &str) -> RouterResult<bool> {
        self.transition(reference, OrderStatus::Ready, true)
    }

    fn transition(
        &self,
        reference: &str,
        target: OrderStatus,
        include_ready_lines: bool,
    ) -> RouterResult<bool> {
        let txn = self.storage.begin_write()?;
        let Some(mut order) = self.storage.find_order_by_reference_txn(&txn, reference)? else {
            tracing::debug!(reference, status = %target, "Transition on unknown order ignored");
            return Ok(false);
        };

        let from = order.status();
        order.order_status = Some(target);
        if target == OrderStatus::Ready {
            order.is_cooking = false;
        }
        order.updated_at = now_millis();
        self.storage.store_order(&txn, &order)?;

        let mut changed_lines = 0usize;
        for mut line in self.storage.lines_for_order_txn(&txn, order.id)? {
            if include_ready_lines || line.status() != OrderStatus::Ready {
                line.order_status = Some(target);
                self.storage.store_line(&txn, &line)?;
                changed_lines += 1;
            }
        }
        txn.commit()?;

        tracing::info!(
            order_id = order.id,
            reference,
            from = %from,
            to = %target,
            lines = changed_lines,
            "Kitchen order status changed"
        );
        self.notify();
        Ok(true)
    }

    /// Partial update of an order
    ///
    /// A waiting order keeps `waiting` unless the update names another
    /// status; draft is never restored through this path.
    pub fn update_order(
        &self,
        reference: &str,
        update: OrderUpdate,
    ) -> RouterResult<Option<KitchenOrder>> {
        let txn = self.storage.begin_write()?;
        let Some(mut order) = self.storage.find_order_by_reference_txn(&txn, reference)? else {
            return Ok(None);
        };

        if let Some(floor) = update.floor {
            order.floor = floor;
        }
        if let Some(hour) = update.hour {
            order.hour = hour;
        }
        if let Some(minutes) = update.minutes {
            order.minutes = minutes;
        }
        if let Some(customer_id) = update.customer_id {
            order.customer_id = Some(customer_id);
        }
        if let Some(is_cooking) = update.is_cooking {
            order.is_cooking = is_cooking;
        }

        match update.order_status {
            Some(OrderStatus::Draft) if order.status() == OrderStatus::Waiting => {
                tracing::debug!(reference, "Draft ignored on waiting order");
            }
            Some(status) => order.order_status = Some(status),
            None => {}
        }
        if order.status() == OrderStatus::Ready {
            order.is_cooking = false;
        }

        if let Some(state) = update.state {
            if state == PosState::Paid && !order.is_named() {
                order.name = self.next_order_name(&txn)?;
            }
            order.state = state;
        }

        order.updated_at = now_millis();
        self.storage.store_order(&txn, &order)?;
        txn.commit()?;

        tracing::debug!(order_id = order.id, reference, status = %order.status(), "Kitchen order updated");
        self.notify();
        Ok(Some(order))
    }

    /// Flip one line between ready and waiting
    pub fn toggle_line(&self, line_id: i64) -> RouterResult<Option<OrderStatus>> {
        let txn = self.storage.begin_write()?;
        let Some(mut line) = self.storage.get_line_txn(&txn, line_id)? else {
            return Ok(None);
        };

        let next = match line.status() {
            OrderStatus::Ready => OrderStatus::Waiting,
            _ => OrderStatus::Ready,
        };
        line.order_status = Some(next);
        self.storage.store_line(&txn, &line)?;
        txn.commit()?;

        tracing::info!(line_id, order_id = line.order_id, status = %next, "Kitchen line toggled");
        self.notify();
        Ok(Some(next))
    }

    // ========== Payment ==========

    /// Payment cleared on the register
    ///
    /// Names the order, marks its lines for cooking and, when the register
    /// has a kitchen screen, puts the order itself on that screen.
    pub fn mark_paid(&self, reference: &str) -> RouterResult<Option<KitchenOrder>> {
        let Some(existing) = self.storage.find_order_by_reference(reference)? else {
            return Ok(None);
        };
        let has_screen = self
            .screens
            .find_by_register(existing.register_id)?
            .is_some();

        let txn = self.storage.begin_write()?;
        let Some(mut order) = self.storage.find_order_by_reference_txn(&txn, reference)? else {
            return Ok(None);
        };

        if !order.is_named() {
            order.name = self.next_order_name(&txn)?;
        }
        order.state = PosState::Paid;
        if has_screen {
            order.is_cooking = true;
            order.order_ref = Some(order.name.clone());
        }
        order.updated_at = now_millis();
        self.storage.store_order(&txn, &order)?;

        for mut line in self.storage.lines_for_order_txn(&txn, order.id)? {
            line.is_cooking = true;
            self.storage.store_line(&txn, &line)?;
        }
        txn.commit()?;

        tracing::info!(
            order_id = order.id,
            reference,
            name = %order.name,
            has_screen,
            "Kitchen order paid"
        );
        self.notify();
        Ok(Some(order))
    }

    fn next_order_name(&self, txn: &WriteTransaction) -> RouterResult<String> {
        let n = self.storage.next_sequence(txn, ORDER_SEQUENCE_CODE)?;
        Ok(format!("Order {:05}", n))
    }

    // ========== Queries ==========

    /// Products on an order (empty for unknown references)
    pub fn product_details(&self, reference: &str) -> RouterResult<Vec<ProductDetail>> {
        let Some(order) = self.storage.find_order_by_reference(reference)? else {
            return Ok(Vec::new());
        };
        Ok(self
            .storage
            .lines_for_order(order.id)?
            .into_iter()
            .map(|line| ProductDetail {
                product_id: line.product_id,
                name: self.catalog.product_name(line.product_id),
                qty: line.qty,
            })
            .collect())
    }

    /// Stored order by reference
    pub fn find_order(&self, reference: &str) -> RouterResult<Option<KitchenOrder>> {
        Ok(self.storage.find_order_by_reference(reference)?)
    }

    /// Stored lines of an order, in creation order
    pub fn order_lines(&self, order_id: i64) -> RouterResult<Vec<KitchenOrderLine>> {
        Ok(self.storage.lines_for_order(order_id)?)
    }
}

fn validate(snapshot: &OrderSnapshot) -> RouterResult<()> {
    if snapshot.reference.trim().is_empty() {
        return Err(RouterError::Malformed("empty reference".to_string()));
    }
    if snapshot.lines.iter().any(|l| l.product_id.is_none()) {
        return Err(RouterError::Malformed(format!(
            "order {} has a line without product",
            snapshot.reference
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
