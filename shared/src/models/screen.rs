//! Kitchen Screen Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sequence placeholder meaning "generate one for me"
pub const NEW_SEQUENCE: &str = "New";

/// 厨房屏幕 - 绑定一台收银机和一组允许显示的分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenScreen {
    pub id: i64,
    /// Generated once at creation, never changed afterwards
    pub sequence: String,
    pub register_id: i64,
    /// Allowed POS categories, sorted. Empty means every category.
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create kitchen screen payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenCreate {
    pub register_id: i64,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    /// Explicit sequence; `None` or `"New"` generates one
    pub sequence: Option<String>,
}

/// Update kitchen screen payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenUpdate {
    pub register_id: Option<i64>,
    pub category_ids: Option<Vec<i64>>,
}

/// Categories a screen may display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedCategories {
    /// No category filtering configured
    All,
    Only(BTreeSet<i64>),
}

impl AllowedCategories {
    pub fn from_ids(ids: &[i64]) -> Self {
        if ids.is_empty() {
            Self::All
        } else {
            Self::Only(ids.iter().copied().collect())
        }
    }

    pub fn contains(&self, category_id: i64) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.contains(&category_id),
        }
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

/// What a screen client needs to open its kitchen view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenLaunch {
    pub screen_id: i64,
    pub register_id: i64,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_categories_empty_is_all() {
        let allowed = AllowedCategories::from_ids(&[]);
        assert_eq!(allowed, AllowedCategories::All);
        assert!(allowed.contains(42));
        assert!(!allowed.is_restricted());
    }

    #[test]
    fn test_allowed_categories_only() {
        let allowed = AllowedCategories::from_ids(&[3, 1, 3]);
        assert!(allowed.is_restricted());
        assert!(allowed.contains(1));
        assert!(allowed.contains(3));
        assert!(!allowed.contains(2));
    }

    #[test]
    fn test_screen_create_categories_default() {
        let create: ScreenCreate = serde_json::from_str(r#"{"register_id": 5}"#).unwrap();
        assert!(create.category_ids.is_empty());
        assert!(create.sequence.is_none());
    }
}
