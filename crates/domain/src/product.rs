//! Catalog types as the backend API serializes them.
//!
//! Prices arrive as decimal strings (the backend's decimal field) and are
//! parsed into `rust_decimal::Decimal`; float math is never used for money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a catalog product, unique across the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A product as returned by `GET products/` and `GET products/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: ProductId,
    /// Identifier of the owning category, if any.
    #[serde(default)]
    pub category: Option<i64>,
    /// Denormalized category label for display.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, serialized by the backend as a decimal string.
    pub price: Decimal,
    /// Units currently in stock.
    #[serde(default)]
    pub stock: Option<i64>,
    /// Absolute URL of the primary product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the product is visible in the storefront.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-modification timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

/// A product category as returned by `GET categories/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Filters for the product list endpoint, mapped to query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Free-text search term.
    pub search: Option<String>,
    /// Restrict to a single category.
    pub category: Option<i64>,
    /// Server-side ordering key (e.g. `price`, `-created_at`).
    pub ordering: Option<String>,
}

impl ProductQuery {
    /// Returns the query as `(name, value)` pairs, omitting unset filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search".to_owned(), search.clone()));
        }
        if let Some(category) = self.category {
            pairs.push(("category".to_owned(), category.to_string()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering".to_owned(), ordering.clone()));
        }
        pairs
    }

    /// Returns true if no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none() && self.ordering.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_product_deserializes_price_string() {
        let json = r#"{
            "id": 3,
            "category": 1,
            "category_name": "Audio",
            "name": "Headphones",
            "description": "Over-ear",
            "price": "129.99",
            "stock": 12,
            "image_url": null,
            "is_active": true
        }"#;

        let product: Product = serde_json::from_str(json).expect("valid product");
        assert_eq!(product.id, ProductId(3));
        assert_eq!(product.price.to_string(), "129.99");
        assert_eq!(product.category_name.as_deref(), Some("Audio"));
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{"id": 9, "name": "Mug", "price": "4.50"}"#;
        let product: Product = serde_json::from_str(json).expect("valid product");
        assert!(product.is_active);
        assert_eq!(product.stock, None);
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_query_pairs_omit_unset_filters() {
        let query = ProductQuery {
            search: Some("mug".to_owned()),
            category: None,
            ordering: Some("-price".to_owned()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search".to_owned(), "mug".to_owned()),
                ("ordering".to_owned(), "-price".to_owned()),
            ]
        );
        assert!(ProductQuery::default().is_empty());
    }
}
