//! Menu-engineering and reporting aggregation over finished dishes and
//! stocked inventory. Everything here is a fold over the caller's lists;
//! nothing reads storage.

use serde::{Deserialize, Serialize};

use crate::metrics::classify_menu_category;
use crate::model::{Dish, InventoryItem, MenuCategory, MenuDish, StockStatus};

/// Margin percent at or above which a dish counts as high-margin in the
/// menu filters.
const HIGH_MARGIN_PERCENT: f64 = 70.0;

/// Headline numbers for the menu-engineering view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuAnalytics {
    pub avg_margin_percent: f64,
    pub avg_food_cost: f64,
    pub problem_dishes: usize,
}

/// Stock value summary for the reports view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryValuation {
    /// Purchase value of everything on hand.
    pub total_value: f64,
    /// Purchase value of batches about to expire.
    pub expiring_value: f64,
}

/// Predicate filters for the menu-engineering dish list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFilter {
    All,
    /// Dogs and questions.
    Problems,
    HighMargin,
    /// Dishes carrying stock warnings.
    AtRisk,
}

/// Projects a dish into its menu-engineering row, classifying it by food
/// cost.
pub fn to_menu_dish(dish: &Dish) -> MenuDish {
    MenuDish {
        dish_id: dish.id,
        dish_name: dish.name.clone(),
        cost: dish.economics.total_cost,
        price: dish.sale_price,
        margin: dish.economics.margin,
        margin_percent: dish.economics.margin_percent,
        food_cost_percent: dish.economics.food_cost_percent,
        category: classify_menu_category(dish.economics.food_cost_percent),
        warnings: dish.warnings.clone(),
    }
}

/// Averages margins and food cost across the menu and counts problem dishes
/// (dogs and questions). An empty menu yields all zeroes.
pub fn menu_overview(dishes: &[MenuDish]) -> MenuAnalytics {
    if dishes.is_empty() {
        return MenuAnalytics {
            avg_margin_percent: 0.0,
            avg_food_cost: 0.0,
            problem_dishes: 0,
        };
    }
    let n = dishes.len() as f64;
    let margin_sum: f64 = dishes.iter().map(|d| d.margin_percent).sum();
    let food_cost_sum: f64 = dishes.iter().map(|d| d.food_cost_percent).sum();
    let problem_dishes = dishes
        .iter()
        .filter(|d| matches!(d.category, MenuCategory::Dog | MenuCategory::Question))
        .count();
    MenuAnalytics {
        avg_margin_percent: margin_sum / n,
        avg_food_cost: food_cost_sum / n,
        problem_dishes,
    }
}

/// Applies a menu filter, preserving order.
pub fn filter_menu<'a>(dishes: &'a [MenuDish], filter: MenuFilter) -> Vec<&'a MenuDish> {
    dishes
        .iter()
        .filter(|d| match filter {
            MenuFilter::All => true,
            MenuFilter::Problems => {
                matches!(d.category, MenuCategory::Dog | MenuCategory::Question)
            }
            MenuFilter::HighMargin => d.margin_percent >= HIGH_MARGIN_PERCENT,
            MenuFilter::AtRisk => !d.warnings.is_empty(),
        })
        .collect()
}

/// Sums purchase value of all stock and of the expiring subset.
pub fn inventory_valuation(items: &[InventoryItem]) -> InventoryValuation {
    let total_value = items.iter().map(|i| i.price).sum();
    let expiring_value = items
        .iter()
        .filter(|i| i.status == StockStatus::Expiring)
        .map(|i| i.price)
        .sum();
    InventoryValuation {
        total_value,
        expiring_value,
    }
}
