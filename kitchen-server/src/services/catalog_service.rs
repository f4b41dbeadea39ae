//! Catalog Service - cached POS master data (categories, products, registers)
//!
//! The point-of-sale pushes its master data through the catalog API; the
//! snapshot is persisted in redb and served from memory. Routing never writes
//! through this service.

use crate::db::{KitchenStorage, StorageResult};
use parking_lot::RwLock;
use shared::models::{Category, Product, Register};
use std::collections::HashMap;
use std::sync::Arc;

/// Unified catalog cache
#[derive(Clone)]
pub struct CatalogService {
    storage: Option<KitchenStorage>,
    /// Categories cache: category_id -> Category
    categories: Arc<RwLock<HashMap<i64, Category>>>,
    /// Products cache: product_id -> Product
    products: Arc<RwLock<HashMap<i64, Product>>>,
    /// Registers cache: register_id -> Register
    registers: Arc<RwLock<HashMap<i64, Register>>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("categories_count", &self.categories.read().len())
            .field("products_count", &self.products.read().len())
            .field("registers_count", &self.registers.read().len())
            .finish()
    }
}

impl CatalogService {
    /// Catalog backed by storage; call [`warmup`](Self::warmup) to load it
    pub fn new(storage: KitchenStorage) -> Self {
        Self {
            storage: Some(storage),
            ..Self::in_memory()
        }
    }

    /// Catalog that only lives in memory
    pub fn in_memory() -> Self {
        Self {
            storage: None,
            categories: Arc::new(RwLock::new(HashMap::new())),
            products: Arc::new(RwLock::new(HashMap::new())),
            registers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // =========================================================================
    // Warmup
    // =========================================================================

    /// Load the persisted snapshot into memory
    pub fn warmup(&self) -> StorageResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let categories = storage.all_categories()?;
        let products = storage.all_products()?;
        let registers = storage.all_registers()?;

        tracing::info!(
            categories = categories.len(),
            products = products.len(),
            registers = registers.len(),
            "CatalogService: snapshot loaded"
        );

        fill(&self.categories, categories, |c| c.id);
        fill(&self.products, products, |p| p.id);
        fill(&self.registers, registers, |r| r.id);
        Ok(())
    }

    // =========================================================================
    // Replace
    // =========================================================================

    pub fn replace_categories(&self, categories: Vec<Category>) -> StorageResult<()> {
        if let Some(storage) = &self.storage {
            storage.replace_categories(&categories)?;
        }
        fill(&self.categories, categories, |c| c.id);
        Ok(())
    }

    pub fn replace_products(&self, products: Vec<Product>) -> StorageResult<()> {
        if let Some(storage) = &self.storage {
            storage.replace_products(&products)?;
        }
        fill(&self.products, products, |p| p.id);
        Ok(())
    }

    pub fn replace_registers(&self, registers: Vec<Register>) -> StorageResult<()> {
        if let Some(storage) = &self.storage {
            storage.replace_registers(&registers)?;
        }
        fill(&self.registers, registers, |r| r.id);
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get_category(&self, id: i64) -> Option<Category> {
        self.categories.read().get(&id).cloned()
    }

    pub fn get_product(&self, id: i64) -> Option<Product> {
        self.products.read().get(&id).cloned()
    }

    pub fn get_register(&self, id: i64) -> Option<Register> {
        self.registers.read().get(&id).cloned()
    }

    /// Category ids of a product (empty for unknown or uncategorized products)
    pub fn product_categories(&self, product_id: i64) -> Vec<i64> {
        self.products
            .read()
            .get(&product_id)
            .map(|p| p.category_ids.clone())
            .unwrap_or_default()
    }

    /// Product display name, empty when unknown
    pub fn product_name(&self, product_id: i64) -> String {
        self.products
            .read()
            .get(&product_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    /// Category display name; falls back to the id for unknown categories
    pub fn category_name(&self, category_id: i64) -> String {
        self.categories
            .read()
            .get(&category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| category_id.to_string())
    }

    pub fn list_categories(&self) -> Vec<Category> {
        sorted_values(&self.categories, |c| c.id)
    }

    pub fn list_products(&self) -> Vec<Product> {
        sorted_values(&self.products, |p| p.id)
    }

    pub fn list_registers(&self) -> Vec<Register> {
        sorted_values(&self.registers, |r| r.id)
    }
}

fn fill<T>(cache: &RwLock<HashMap<i64, T>>, items: Vec<T>, key: impl Fn(&T) -> i64) {
    let mut cache = cache.write();
    cache.clear();
    for item in items {
        cache.insert(key(&item), item);
    }
}

fn sorted_values<T: Clone>(cache: &RwLock<HashMap<i64, T>>, key: impl Fn(&T) -> i64) -> Vec<T> {
    let mut items: Vec<T> = cache.read().values().cloned().collect();
    items.sort_by_key(|item| key(item));
    items
}
