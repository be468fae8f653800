//! System-owned product catalog: the reference list of purchasable products
//! with their categories, base units and shelf lives. Inventory receipts and
//! recipe ingredients reference catalog ids.

use serde::{Deserialize, Serialize};

use crate::model::Unit;

/// A normalized catalog entry. `shelf_life_days` drives expiry computation
/// for every batch of this product received into stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub shelf_life_days: u32,
}

/// Search is autocomplete-shaped: at most this many hits.
const MAX_SEARCH_RESULTS: usize = 8;
/// Queries shorter than this return nothing.
const MIN_QUERY_LEN: usize = 2;

/// Read-only catalog with substring search.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
}

impl Catalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Catalog { products }
    }

    /// The default product set the application ships with.
    pub fn with_defaults() -> Self {
        Catalog::new(default_products())
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Case-insensitive substring search, capped at 8 results. Queries under
    /// two characters match nothing.
    pub fn search(&self, query: &str) -> Vec<&CatalogProduct> {
        if query.len() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }
}

fn entry(id: &str, name: &str, category: &str, unit: Unit, shelf_life_days: u32) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        unit,
        shelf_life_days,
    }
}

/// Seed data matching the product list the application launched with.
pub fn default_products() -> Vec<CatalogProduct> {
    use Unit::{Grams, Milliliters, Pieces};
    vec![
        // dairy
        entry("dairy-001", "Cream 30%", "dairy", Milliliters, 5),
        entry("dairy-002", "Cream 36%", "dairy", Milliliters, 5),
        entry("dairy-003", "Butter", "dairy", Grams, 14),
        entry("dairy-004", "Cream cheese", "dairy", Grams, 14),
        entry("dairy-005", "Milk 3.2%", "dairy", Milliliters, 5),
        entry("dairy-006", "Parmesan", "dairy", Grams, 30),
        entry("dairy-007", "Mozzarella", "dairy", Grams, 7),
        // meat and poultry
        entry("meat-001", "Bacon", "meat", Grams, 7),
        entry("meat-002", "Chicken fillet", "meat", Grams, 2),
        entry("meat-003", "Beef tenderloin", "meat", Grams, 3),
        entry("meat-004", "Pork neck", "meat", Grams, 3),
        entry("meat-005", "Turkey fillet", "meat", Grams, 2),
        // seafood
        entry("seafood-001", "Salmon steak", "seafood", Grams, 2),
        entry("seafood-002", "Shrimp", "seafood", Grams, 2),
        entry("seafood-003", "Mussels", "seafood", Grams, 1),
        // vegetables
        entry("veg-001", "Tomatoes", "vegetables", Grams, 5),
        entry("veg-002", "Cucumbers", "vegetables", Grams, 7),
        entry("veg-003", "Iceberg lettuce", "vegetables", Grams, 3),
        entry("veg-004", "Onion", "vegetables", Grams, 30),
        entry("veg-005", "Garlic", "vegetables", Grams, 30),
        entry("veg-006", "Bell pepper", "vegetables", Grams, 7),
        // herbs
        entry("herbs-001", "Basil", "herbs", Grams, 3),
        entry("herbs-002", "Parsley", "herbs", Grams, 5),
        entry("herbs-003", "Dill", "herbs", Grams, 5),
        entry("herbs-004", "Cilantro", "herbs", Grams, 5),
        // grocery
        entry("grocery-001", "Wheat flour", "grocery", Grams, 180),
        entry("grocery-002", "Sugar", "grocery", Grams, 365),
        entry("grocery-003", "Salt", "grocery", Grams, 365),
        entry("grocery-004", "Rice", "grocery", Grams, 180),
        entry("grocery-005", "Spaghetti", "grocery", Grams, 180),
        entry("grocery-006", "Olive oil", "grocery", Milliliters, 365),
        // eggs
        entry("eggs-001", "Chicken eggs", "eggs", Pieces, 21),
    ]
}
