//! redb-based storage for kitchen orders, lines and screens
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `KitchenOrder` (JSON) | Order records |
//! | `orders_by_reference` | `reference` | `order_id` | Unique external reference index |
//! | `order_lines` | `line_id` | `KitchenOrderLine` (JSON) | Line records |
//! | `order_lines_by_order` | `(order_id, line_id)` | `()` | Lines of an order |
//! | `kitchen_screens` | `screen_id` | `KitchenScreen` (JSON) | Screen configuration |
//! | `sequences` | `code` | `u64` | Id and name counters |
//! | `catalog_categories` | `category_id` | `Category` (JSON) | Master data snapshot |
//! | `catalog_products` | `product_id` | `Product` (JSON) | Master data snapshot |
//! | `catalog_registers` | `register_id` | `Register` (JSON) | Master data snapshot |
//!
//! Every write goes through a single `WriteTransaction`; redb serializes
//! writers, so one request observes no partial state of another.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Category, KitchenOrder, KitchenOrderLine, KitchenScreen, Product, Register};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders table: key = order_id, value = JSON
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Index: reference -> order_id
const ORDERS_BY_REFERENCE_TABLE: TableDefinition<&str, i64> =
    TableDefinition::new("orders_by_reference");

/// Lines table: key = line_id, value = JSON
const LINES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("order_lines");

/// Index: (order_id, line_id) -> ()
const LINES_BY_ORDER_TABLE: TableDefinition<(i64, i64), ()> =
    TableDefinition::new("order_lines_by_order");

/// Screens table: key = screen_id, value = JSON
const SCREENS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("kitchen_screens");

/// Counters: key = sequence code, value = last issued value
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const CATEGORIES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("catalog_categories");
const PRODUCTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("catalog_products");
const REGISTERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("catalog_registers");

const ORDER_ID_CODE: &str = "id.order";
const LINE_ID_CODE: &str = "id.order_line";
const SCREEN_ID_CODE: &str = "id.kitchen_screen";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sequence overflow: {0}")]
    SequenceOverflow(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::error::AppError {
    fn from(err: StorageError) -> Self {
        shared::error::AppError::database(err.to_string())
    }
}

/// Kitchen storage backed by redb
#[derive(Clone)]
pub struct KitchenStorage {
    db: Arc<Database>,
}

impl KitchenStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_REFERENCE_TABLE)?;
            let _ = write_txn.open_table(LINES_TABLE)?;
            let _ = write_txn.open_table(LINES_BY_ORDER_TABLE)?;
            let _ = write_txn.open_table(SCREENS_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(REGISTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequences ==========

    /// Increment and return the counter for `code` (starts at 1)
    pub fn next_sequence(&self, txn: &WriteTransaction, code: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(code)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current
            .checked_add(1)
            .ok_or_else(|| StorageError::SequenceOverflow(code.to_string()))?;
        table.insert(code, next)?;
        Ok(next)
    }

    fn next_id(&self, txn: &WriteTransaction, code: &str) -> StorageResult<i64> {
        let next = self.next_sequence(txn, code)?;
        i64::try_from(next).map_err(|_| StorageError::SequenceOverflow(code.to_string()))
    }

    pub fn next_order_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        self.next_id(txn, ORDER_ID_CODE)
    }

    pub fn next_line_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        self.next_id(txn, LINE_ID_CODE)
    }

    pub fn next_screen_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        self.next_id(txn, SCREEN_ID_CODE)
    }

    // ========== Orders ==========

    /// Store an order and keep the reference index in sync
    pub fn store_order(&self, txn: &WriteTransaction, order: &KitchenOrder) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id, value.as_slice())?;

        let mut idx_table = txn.open_table(ORDERS_BY_REFERENCE_TABLE)?;
        idx_table.insert(order.reference.as_str(), order.id)?;

        Ok(())
    }

    /// Find an order by its external reference
    pub fn find_order_by_reference(&self, reference: &str) -> StorageResult<Option<KitchenOrder>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(ORDERS_BY_REFERENCE_TABLE)?;
        let Some(id) = idx_table.get(reference)?.map(|guard| guard.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(ORDERS_TABLE)?;
        read_json(&table, id)
    }

    /// Find an order by its external reference (within transaction)
    pub fn find_order_by_reference_txn(
        &self,
        txn: &WriteTransaction,
        reference: &str,
    ) -> StorageResult<Option<KitchenOrder>> {
        let id = {
            let idx_table = txn.open_table(ORDERS_BY_REFERENCE_TABLE)?;
            idx_table.get(reference)?.map(|guard| guard.value())
        };
        let Some(id) = id else {
            return Ok(None);
        };
        let table = txn.open_table(ORDERS_TABLE)?;
        read_json(&table, id)
    }

    /// All orders placed on a register, in id order
    pub fn orders_for_register(&self, register_id: i64) -> StorageResult<Vec<KitchenOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_, guard) = result?;
            let order: KitchenOrder = serde_json::from_slice(guard.value())?;
            if order.register_id == register_id {
                orders.push(order);
            }
        }

        Ok(orders)
    }

    // ========== Order Lines ==========

    /// Store a line and index it under its order
    pub fn store_line(&self, txn: &WriteTransaction, line: &KitchenOrderLine) -> StorageResult<()> {
        let mut table = txn.open_table(LINES_TABLE)?;
        let value = serde_json::to_vec(line)?;
        table.insert(line.id, value.as_slice())?;

        let mut idx_table = txn.open_table(LINES_BY_ORDER_TABLE)?;
        idx_table.insert((line.order_id, line.id), ())?;

        Ok(())
    }

    /// Get a line by ID (within transaction)
    pub fn get_line_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StorageResult<Option<KitchenOrderLine>> {
        let table = txn.open_table(LINES_TABLE)?;
        read_json(&table, id)
    }

    /// Get a line by ID
    pub fn get_line(&self, id: i64) -> StorageResult<Option<KitchenOrderLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LINES_TABLE)?;
        read_json(&table, id)
    }

    /// Lines of an order, in creation order
    pub fn lines_for_order(&self, order_id: i64) -> StorageResult<Vec<KitchenOrderLine>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(LINES_BY_ORDER_TABLE)?;
        let data_table = read_txn.open_table(LINES_TABLE)?;
        collect_lines(&idx_table, &data_table, order_id)
    }

    /// Lines of an order, in creation order (within transaction)
    pub fn lines_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Vec<KitchenOrderLine>> {
        let idx_table = txn.open_table(LINES_BY_ORDER_TABLE)?;
        let data_table = txn.open_table(LINES_TABLE)?;
        collect_lines(&idx_table, &data_table, order_id)
    }

    // ========== Kitchen Screens ==========

    /// Store a screen
    pub fn store_screen(&self, txn: &WriteTransaction, screen: &KitchenScreen) -> StorageResult<()> {
        let mut table = txn.open_table(SCREENS_TABLE)?;
        let value = serde_json::to_vec(screen)?;
        table.insert(screen.id, value.as_slice())?;
        Ok(())
    }

    /// Get a screen by ID
    pub fn get_screen(&self, id: i64) -> StorageResult<Option<KitchenScreen>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SCREENS_TABLE)?;
        read_json(&table, id)
    }

    /// All screens, active or not, in id order
    pub fn all_screens(&self) -> StorageResult<Vec<KitchenScreen>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SCREENS_TABLE)?;
        collect_all(&table)
    }

    /// All screens (within transaction)
    pub fn all_screens_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<KitchenScreen>> {
        let table = txn.open_table(SCREENS_TABLE)?;
        collect_all(&table)
    }

    // ========== Catalog Snapshot ==========

    /// Replace every stored category
    pub fn replace_categories(&self, items: &[Category]) -> StorageResult<()> {
        replace_table(&self.db, CATEGORIES_TABLE, items.iter().map(|c| (c.id, c)))
    }

    /// Replace every stored product
    pub fn replace_products(&self, items: &[Product]) -> StorageResult<()> {
        replace_table(&self.db, PRODUCTS_TABLE, items.iter().map(|p| (p.id, p)))
    }

    /// Replace every stored register
    pub fn replace_registers(&self, items: &[Register]) -> StorageResult<()> {
        replace_table(&self.db, REGISTERS_TABLE, items.iter().map(|r| (r.id, r)))
    }

    pub fn all_categories(&self) -> StorageResult<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        collect_all(&read_txn.open_table(CATEGORIES_TABLE)?)
    }

    pub fn all_products(&self) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        collect_all(&read_txn.open_table(PRODUCTS_TABLE)?)
    }

    pub fn all_registers(&self) -> StorageResult<Vec<Register>> {
        let read_txn = self.db.begin_read()?;
        collect_all(&read_txn.open_table(REGISTERS_TABLE)?)
    }

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let lines = read_txn.open_table(LINES_TABLE)?;
        let screens = read_txn.open_table(SCREENS_TABLE)?;

        Ok(StorageStats {
            order_count: orders.len()?,
            line_count: lines.len()?,
            screen_count: screens.len()?,
        })
    }
}

impl std::fmt::Debug for KitchenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenStorage")
            .field("db", &"<redb::Database>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub order_count: u64,
    pub line_count: u64,
    pub screen_count: u64,
}

fn replace_table<'a, T, I>(
    db: &Database,
    definition: TableDefinition<'static, i64, &'static [u8]>,
    items: I,
) -> StorageResult<()>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (i64, &'a T)>,
{
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(definition)?;
        table.retain(|_, _| false)?;
        for (id, item) in items {
            let value = serde_json::to_vec(item)?;
            table.insert(id, value.as_slice())?;
        }
    }
    txn.commit()?;
    Ok(())
}

fn read_json<T, Tb>(table: &Tb, id: i64) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    Tb: ReadableTable<i64, &'static [u8]>,
{
    match table.get(id)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

fn collect_all<T, Tb>(table: &Tb) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    Tb: ReadableTable<i64, &'static [u8]>,
{
    let mut items = Vec::new();
    for result in table.iter()? {
        let (_, guard) = result?;
        items.push(serde_json::from_slice(guard.value())?);
    }
    Ok(items)
}

fn collect_lines<Idx, Data>(
    idx_table: &Idx,
    data_table: &Data,
    order_id: i64,
) -> StorageResult<Vec<KitchenOrderLine>>
where
    Idx: ReadableTable<(i64, i64), ()>,
    Data: ReadableTable<i64, &'static [u8]>,
{
    let mut lines = Vec::new();
    for result in idx_table.range((order_id, i64::MIN)..=(order_id, i64::MAX))? {
        let (key, _) = result?;
        let (_, line_id) = key.value();
        if let Some(line) = read_json(data_table, line_id)? {
            lines.push(line);
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, PosState, UNNAMED_ORDER};

    fn order(id: i64, reference: &str, register_id: i64) -> KitchenOrder {
        KitchenOrder {
            id,
            reference: reference.to_string(),
            register_id,
            name: UNNAMED_ORDER.to_string(),
            order_ref: None,
            order_status: Some(OrderStatus::Draft),
            is_cooking: true,
            hour: "12".to_string(),
            minutes: "30".to_string(),
            floor: String::new(),
            customer_id: None,
            state: PosState::Draft,
            date_order: 1_000,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    fn line(id: i64, order_id: i64) -> KitchenOrderLine {
        KitchenOrderLine {
            id,
            order_id,
            product_id: 7,
            qty: 1.0,
            name: format!("L{id}"),
            note: None,
            order_status: None,
            is_cooking: true,
            created_at: 1_000,
        }
    }

    #[test]
    fn test_order_reference_index() {
        let storage = KitchenStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(1, "R1", 10)).unwrap();
        storage.store_order(&txn, &order(2, "R2", 11)).unwrap();
        txn.commit().unwrap();

        let found = storage.find_order_by_reference("R2").unwrap().unwrap();
        assert_eq!(found.id, 2);
        assert!(storage.find_order_by_reference("R3").unwrap().is_none());
        assert_eq!(storage.orders_for_register(10).unwrap().len(), 1);
    }

    #[test]
    fn test_lines_are_scoped_to_their_order() {
        let storage = KitchenStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(1, "R1", 10)).unwrap();
        storage.store_order(&txn, &order(2, "R2", 10)).unwrap();
        storage.store_line(&txn, &line(3, 1)).unwrap();
        storage.store_line(&txn, &line(1, 1)).unwrap();
        storage.store_line(&txn, &line(2, 2)).unwrap();
        txn.commit().unwrap();

        let ids: Vec<i64> = storage
            .lines_for_order(1)
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(storage.get_line(2).unwrap().unwrap().order_id, 2);
    }

    #[test]
    fn test_sequences_are_independent() {
        let storage = KitchenStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_order_id(&txn).unwrap(), 1);
        assert_eq!(storage.next_order_id(&txn).unwrap(), 2);
        assert_eq!(storage.next_line_id(&txn).unwrap(), 1);
        assert_eq!(storage.next_sequence(&txn, "kitchen.screen").unwrap(), 1);
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_order_id(&txn).unwrap(), 3);
        txn.commit().unwrap();
    }

    #[test]
    fn test_catalog_snapshot_is_replaced() {
        let storage = KitchenStorage::open_in_memory().unwrap();
        let grill = Category { id: 1, name: "Grill".to_string() };
        let bar = Category { id: 2, name: "Bar".to_string() };

        storage.replace_categories(&[grill.clone(), bar]).unwrap();
        assert_eq!(storage.all_categories().unwrap().len(), 2);

        storage.replace_categories(&[grill]).unwrap();
        let categories = storage.all_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Grill");
    }

    #[test]
    fn test_aborted_write_is_not_visible() {
        let storage = KitchenStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(1, "R1", 10)).unwrap();
        drop(txn);

        assert!(storage.find_order_by_reference("R1").unwrap().is_none());
        assert_eq!(storage.get_stats().unwrap().order_count, 0);
    }
}
