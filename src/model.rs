use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base unit a catalog product is measured in. Quantities and unit prices are
/// always expressed per base unit (per gram, per milliliter, per piece).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Milliliters,
    #[serde(rename = "pcs")]
    Pieces,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Milliliters => "ml",
            Unit::Pieces => "pcs",
        }
    }
}

/// Expiry-only classification used by the simple inventory flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FreshnessStatus {
    Fresh,
    Expiring,
    Expired,
}

/// Combined expiry + quantity classification used by the richer stock flow.
/// Expiry always wins over low-stock when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    Low,
    Expiring,
    Expired,
}

/// A batch of stock on hand. Created on receipt, mutated only by
/// quantity/price correction, removed on disposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub catalog_product_id: String,
    pub product_name: String,
    pub category: String,
    pub unit: Unit,
    /// Purchase price for the whole stocked quantity.
    pub price: f64,
    /// Quantity on hand, in base units.
    pub quantity: f64,
    pub received_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: StockStatus,
    pub warnings: Vec<String>,
}

impl InventoryItem {
    /// Cost of one base unit of this item. Zero when nothing is stocked,
    /// so a dangling or empty batch never poisons a cost preview.
    pub fn unit_price(&self) -> f64 {
        if self.quantity > 0.0 {
            self.price / self.quantity
        } else {
            0.0
        }
    }
}

/// One ingredient line of a recipe, priced at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    pub catalog_product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub unit_price: f64,
    /// quantity * unit_price, frozen when the recipe is created.
    pub cost: f64,
}

/// A costed recipe. Immutable after creation apart from deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub servings: u32,
    pub ingredients: Vec<IngredientLine>,
    pub total_cost: f64,
    pub cost_per_serving: f64,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Profitability tier of a dish, from margin percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfitStatus {
    Profit,
    Warning,
    Loss,
}

/// One recipe referenced by a dish, with the cost snapshot taken when the
/// dish was created (one serving consumed per component by convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishComponent {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub servings: u32,
    pub cost: f64,
}

/// Margin arithmetic for a priced dish. Invariant: margin + total_cost equals
/// the sale price exactly (floating-point epsilon aside).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DishEconomics {
    pub total_cost: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub food_cost_percent: f64,
    pub status: ProfitStatus,
}

/// A sellable dish composed of recipe servings. Immutable after creation
/// apart from deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub components: Vec<DishComponent>,
    pub sale_price: f64,
    pub economics: DishEconomics,
    pub recommended_price: f64,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Menu-engineering tier, from food-cost percent alone. The classic model
/// uses a second sales-volume axis; this single-axis collapse is deliberate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuCategory {
    Star,
    CashCow,
    Question,
    Dog,
}

/// Reporting projection of a dish for the menu-engineering view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDish {
    pub dish_id: i64,
    pub dish_name: String,
    pub cost: f64,
    pub price: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub food_cost_percent: f64,
    pub category: MenuCategory,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(price: f64, quantity: f64) -> InventoryItem {
        InventoryItem {
            id: 1,
            catalog_product_id: "dairy-001".into(),
            product_name: "Cream 30%".into(),
            category: "dairy".into(),
            unit: Unit::Milliliters,
            price,
            quantity,
            received_at: Utc::now(),
            expires_at: Utc::now(),
            status: StockStatus::InStock,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn unit_price_divides_price_by_quantity() {
        assert_eq!(item(12.5, 2000.0).unit_price(), 0.00625);
    }

    #[test]
    fn unit_price_of_empty_batch_is_zero() {
        assert_eq!(item(12.5, 0.0).unit_price(), 0.0);
    }

    #[test]
    fn unit_serde_uses_short_labels() {
        assert_eq!(serde_json::to_string(&Unit::Pieces).unwrap(), "\"pcs\"");
        let u: Unit = serde_json::from_str("\"ml\"").unwrap();
        assert_eq!(u, Unit::Milliliters);
    }
}
