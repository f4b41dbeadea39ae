//! Kitchen Order Model
//!
//! Stored records ([`KitchenOrder`], [`KitchenOrderLine`]), inbound payloads
//! from the register ([`OrderSnapshot`]) and the read projections returned to
//! kitchen screens ([`OrderView`], [`LineView`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name carried by an order until its payment clears
pub const UNNAMED_ORDER: &str = "/";

/// 出餐状态 (订单和菜品共用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Draft,
    /// 制作中
    Waiting,
    Ready,
    Cancel,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Waiting => write!(f, "waiting"),
            Self::Ready => write!(f, "ready"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// Payment state of the POS order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosState {
    #[default]
    Draft,
    Paid,
}

/// Kitchen order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenOrder {
    pub id: i64,
    /// External POS reference, unique
    pub reference: String,
    pub register_id: i64,
    /// `"/"` until paid
    pub name: String,
    /// Order name recorded once the paid order reached a kitchen screen
    #[serde(default)]
    pub order_ref: Option<String>,
    /// `None` for rows written before status tracking; read as draft
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub is_cooking: bool,
    #[serde(default)]
    pub hour: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub state: PosState,
    /// Order timestamp (millis), newest first on screens
    pub date_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl KitchenOrder {
    /// Effective status (missing status reads as draft)
    pub fn status(&self) -> OrderStatus {
        self.order_status.unwrap_or_default()
    }

    pub fn is_named(&self) -> bool {
        self.name != UNNAMED_ORDER
    }
}

/// Kitchen order line record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenOrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub qty: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub is_cooking: bool,
    pub created_at: i64,
}

impl KitchenOrderLine {
    /// Effective status (missing status reads as draft)
    pub fn status(&self) -> OrderStatus {
        self.order_status.unwrap_or_default()
    }
}

// =============================================================================
// Inbound payloads
// =============================================================================

/// Order snapshot sent by the register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// External reference; empty is rejected as malformed
    #[serde(default)]
    pub reference: String,
    /// Only read by the standalone creation path; ingest uses its own register
    #[serde(default)]
    pub register_id: Option<i64>,
    pub floor: Option<String>,
    pub hour: Option<String>,
    pub minutes: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    /// Order timestamp (millis); defaults to now
    #[serde(default)]
    pub date_order: Option<i64>,
    #[serde(default)]
    pub lines: Vec<LineSnapshot>,
}

/// Line embedded in an [`OrderSnapshot`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Missing product makes the whole snapshot malformed
    pub product_id: Option<i64>,
    #[serde(default = "default_qty")]
    pub qty: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_qty() -> f64 {
    1.0
}

/// Partial order update
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub floor: Option<String>,
    pub hour: Option<String>,
    pub minutes: Option<String>,
    pub is_cooking: Option<bool>,
    pub order_status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
    pub state: Option<PosState>,
}

// =============================================================================
// Read projections
// =============================================================================

/// Order as returned to kitchen screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub reference: String,
    pub register_id: i64,
    pub name: String,
    pub order_ref: Option<String>,
    pub order_status: OrderStatus,
    pub is_cooking: bool,
    pub hour: String,
    pub minutes: String,
    pub floor: String,
    pub customer_id: Option<i64>,
    pub state: PosState,
    pub date_order: i64,
    pub line_ids: Vec<i64>,
}

impl OrderView {
    pub fn from_order(order: &KitchenOrder, line_ids: Vec<i64>) -> Self {
        Self {
            id: order.id,
            reference: order.reference.clone(),
            register_id: order.register_id,
            name: order.name.clone(),
            order_ref: order.order_ref.clone(),
            order_status: order.status(),
            is_cooking: order.is_cooking,
            hour: order.hour.clone(),
            minutes: order.minutes.clone(),
            floor: order.floor.clone(),
            customer_id: order.customer_id,
            state: order.state,
            date_order: order.date_order,
            line_ids,
        }
    }
}

/// Order line as returned to kitchen screens
///
/// `order_ref` and `customer_id` come from the parent order at projection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub qty: f64,
    pub name: String,
    pub note: Option<String>,
    pub order_status: OrderStatus,
    pub is_cooking: bool,
    pub order_ref: Option<String>,
    pub customer_id: Option<i64>,
}

impl LineView {
    pub fn from_line(line: &KitchenOrderLine, order: &KitchenOrder, product_name: String) -> Self {
        Self {
            id: line.id,
            order_id: line.order_id,
            product_id: line.product_id,
            product_name,
            qty: line.qty,
            name: line.name.clone(),
            note: line.note.clone(),
            order_status: line.status(),
            is_cooking: line.is_cooking,
            order_ref: order.order_ref.clone(),
            customer_id: order.customer_id,
        }
    }
}

/// What a kitchen screen shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KitchenDetails {
    pub orders: Vec<OrderView>,
    pub lines: Vec<LineView>,
}

impl KitchenDetails {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.lines.is_empty()
    }
}

/// Result of the register-side "can this order be paid" check
///
/// Serializes as a bare boolean, or `{"category": "<name>"}` when a line
/// product belongs to a category the kitchen screen does not show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadyCheck {
    /// `true` while the kitchen is still working on the order
    Pending(bool),
    MissingCategory { category: String },
}

/// Product summary of an order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product_id: i64,
    pub name: String,
    pub qty: f64,
}
