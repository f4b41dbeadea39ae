//! Catalog master data as seen by the kitchen
//!
//! The point-of-sale owns these records; the kitchen server only caches
//! what it needs for routing and filtering.

use serde::{Deserialize, Serialize};

/// POS product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Product with its POS categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Empty when the product is uncategorized
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Point-of-sale register (terminal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub id: i64,
    pub name: String,
    /// Only restaurant registers can drive a kitchen screen
    #[serde(default = "default_true")]
    pub is_restaurant: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_without_categories_deserializes() {
        let product: Product = serde_json::from_str(r#"{"id": 1, "name": "Water"}"#).unwrap();
        assert!(product.category_ids.is_empty());
    }

    #[test]
    fn test_register_defaults_to_restaurant() {
        let register: Register = serde_json::from_str(r#"{"id": 2, "name": "Bar"}"#).unwrap();
        assert!(register.is_restaurant);
    }
}
