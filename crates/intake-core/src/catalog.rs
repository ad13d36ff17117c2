//! Product catalog lookup.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Availability and pricing for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Listed unit price.
    pub price: Decimal,
    /// Whether the product can currently be fulfilled.
    pub in_stock: bool,
}

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Name -> product lookup. Stateless beyond its contents.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON file shaped as
    /// `{"iPhone 15": {"price": "999.99", "in_stock": true}, ...}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let products: HashMap<String, Product> = serde_json::from_str(&data)?;
        Ok(Self { products })
    }

    /// A small built-in catalog for local runs without a catalog file.
    pub fn demo() -> Self {
        let mut catalog = Self::new();
        catalog.insert("iPhone 15", Decimal::new(99_990, 2), true);
        catalog.insert("AirPods Pro", Decimal::new(24_990, 2), true);
        catalog.insert("MacBook Air", Decimal::new(129_990, 2), false);
        catalog
    }

    /// Adds or replaces a product.
    pub fn insert(&mut self, name: impl Into<String>, price: Decimal, in_stock: bool) {
        self.products.insert(name.into(), Product { price, in_stock });
    }

    /// Looks a product up by exact name.
    pub fn lookup(&self, name: &str) -> Option<&Product> {
        self.products.get(name)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_lookup_hit_and_miss() {
        let mut catalog = Catalog::new();
        catalog.insert("Widget", dec!(10.00), true);

        assert!(catalog.lookup("Widget").is_some());
        assert!(catalog.lookup("widget").is_none());
        assert!(catalog.lookup("Gadget").is_none());
    }

    #[test]
    fn test_demo_catalog_has_an_out_of_stock_item() {
        let catalog = Catalog::demo();
        let laptop = catalog.lookup("MacBook Air").unwrap();
        assert!(!laptop.in_stock);
        assert_eq!(laptop.price, dec!(1299.90));
    }
}
