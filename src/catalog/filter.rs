//! Category and free-text filtering over a catalog snapshot

use super::Product;

/// Current category and search text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Exact category to keep; `None` disables category filtering
    pub category: Option<String>,
    /// Raw search text as typed
    pub search: String,
}

impl FilterState {
    /// An empty category string means "all categories"
    pub fn new(category: Option<String>, search: impl Into<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            search: search.into(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref category) = self.category {
            if product.category != *category {
                return false;
            }
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        product.name.to_lowercase().contains(&term)
            || product.brand.to_lowercase().contains(&term)
            || product
                .description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(&term))
    }

    /// Products passing both filters, in source order
    pub fn apply(&self, catalog: &[Product]) -> Vec<Product> {
        catalog.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
