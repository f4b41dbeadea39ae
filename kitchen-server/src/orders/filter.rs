//! Category filtering for kitchen screens

use shared::models::AllowedCategories;

/// Whether a line whose product carries `categories` shows on the screen
///
/// Uncategorized products (and products unknown to the catalog) are always
/// visible; otherwise one allowed category is enough.
pub fn line_visible(allowed: &AllowedCategories, categories: &[i64]) -> bool {
    match allowed {
        AllowedCategories::All => true,
        AllowedCategories::Only(_) => {
            categories.is_empty() || categories.iter().any(|c| allowed.contains(*c))
        }
    }
}

/// Lowest product category the screen does not show
pub fn first_missing_category(allowed: &AllowedCategories, categories: &[i64]) -> Option<i64> {
    if !allowed.is_restricted() {
        return None;
    }
    categories
        .iter()
        .copied()
        .filter(|c| !allowed.contains(*c))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_screen_shows_everything() {
        let allowed = AllowedCategories::All;
        assert!(line_visible(&allowed, &[]));
        assert!(line_visible(&allowed, &[1, 2]));
        assert_eq!(first_missing_category(&allowed, &[1, 2]), None);
    }

    #[test]
    fn test_uncategorized_product_is_visible() {
        let allowed = AllowedCategories::from_ids(&[1]);
        assert!(line_visible(&allowed, &[]));
    }

    #[test]
    fn test_any_allowed_category_is_enough() {
        let allowed = AllowedCategories::from_ids(&[1]);
        assert!(line_visible(&allowed, &[2, 1]));
        assert!(!line_visible(&allowed, &[2, 3]));
    }

    #[test]
    fn test_first_missing_category_is_lowest_id() {
        let allowed = AllowedCategories::from_ids(&[2]);
        assert_eq!(first_missing_category(&allowed, &[9, 2, 4]), Some(4));
        assert_eq!(first_missing_category(&allowed, &[2]), None);
        assert_eq!(first_missing_category(&allowed, &[]), None);
    }
}
