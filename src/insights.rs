//! Deterministic advisory text. The product surface labels these hints
//! "AI", but every one of them is a templated formula over the same numbers
//! the metrics module computes; no inference step is involved.

use crate::model::{DishEconomics, InventoryItem, ProfitStatus, Recipe, StockStatus};

/// Food-cost percent above which a dish gets an optimization nudge.
const HIGH_FOOD_COST_PERCENT: f64 = 40.0;

/// Advisory lines for a priced dish: a profitability verdict, optionally a
/// food-cost nudge, optionally a stock-availability pointer.
pub fn dish_insights(
    economics: &DishEconomics,
    recommended_price: f64,
    has_warnings: bool,
) -> Vec<String> {
    let mut insights = Vec::new();

    match economics.status {
        ProfitStatus::Loss => insights.push(format!(
            "Unprofitable dish! Recommended price from {recommended_price:.2}"
        )),
        ProfitStatus::Warning => insights.push(format!(
            "Low margin. Optimal price: {recommended_price:.2}"
        )),
        ProfitStatus::Profit => insights.push("Healthy profitability".to_string()),
    }

    if economics.food_cost_percent > HIGH_FOOD_COST_PERCENT {
        insights.push("Food cost above 40% - consider optimizing".to_string());
    }

    if has_warnings {
        insights.push("Check ingredient availability in the recipes".to_string());
    }

    insights
}

/// Stock warnings for one recipe ingredient: raised when the referenced
/// batch is running out of shelf life or short on quantity.
pub fn ingredient_warnings(needed: f64, item: &InventoryItem) -> Vec<String> {
    let mut warnings = Vec::new();
    if item.status == StockStatus::Expiring {
        warnings.push(format!("{} expires in a few days", item.product_name));
    }
    if item.quantity < needed {
        warnings.push(format!(
            "Not enough {} in stock (needed: {}, have: {})",
            item.product_name, needed, item.quantity
        ));
    }
    warnings
}

/// Rolls component-recipe stock problems up to the dish: one line per
/// affected recipe with its problem count.
pub fn dish_warnings(component_recipes: &[&Recipe]) -> Vec<String> {
    component_recipes
        .iter()
        .filter(|recipe| !recipe.warnings.is_empty())
        .map(|recipe| {
            format!(
                "{}: {} stock problem{}",
                recipe.name,
                recipe.warnings.len(),
                if recipe.warnings.len() == 1 { "" } else { "s" }
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use chrono::Utc;

    fn economics(margin_percent: f64, food_cost_percent: f64, status: ProfitStatus) -> DishEconomics {
        DishEconomics {
            total_cost: 10.0,
            margin: 5.0,
            margin_percent,
            food_cost_percent,
            status,
        }
    }

    fn recipe(name: &str, warnings: Vec<String>) -> Recipe {
        Recipe {
            id: 1,
            name: name.to_string(),
            servings: 4,
            ingredients: Vec::new(),
            total_cost: 8.0,
            cost_per_serving: 2.0,
            warnings,
            insights: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn loss_dish_gets_price_recommendation() {
        let insights = dish_insights(&economics(5.0, 60.0, ProfitStatus::Loss), 15.38, false);
        assert!(insights[0].contains("Recommended price from 15.38"));
        assert!(insights.iter().any(|i| i.contains("Food cost above 40%")));
    }

    #[test]
    fn profitable_dish_gets_single_verdict() {
        let insights = dish_insights(&economics(65.0, 35.0, ProfitStatus::Profit), 15.38, false);
        assert_eq!(insights, vec!["Healthy profitability".to_string()]);
    }

    #[test]
    fn warning_flag_adds_availability_pointer() {
        let insights = dish_insights(&economics(30.0, 30.0, ProfitStatus::Profit), 12.0, true);
        assert!(insights.iter().any(|i| i.contains("availability")));
    }

    #[test]
    fn short_stock_warns_with_amounts() {
        let item = InventoryItem {
            id: 3,
            catalog_product_id: "veg-001".into(),
            product_name: "Tomatoes".into(),
            category: "vegetables".into(),
            unit: Unit::Grams,
            price: 9.0,
            quantity: 150.0,
            received_at: Utc::now(),
            expires_at: Utc::now(),
            status: StockStatus::Expiring,
            warnings: Vec::new(),
        };
        let warnings = ingredient_warnings(300.0, &item);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("expires in a few days"));
        assert!(warnings[1].contains("needed: 300, have: 150"));
    }

    #[test]
    fn dish_warnings_count_per_recipe() {
        let clean = recipe("Pesto", Vec::new());
        let troubled = recipe("Carbonara", vec!["a".into(), "b".into()]);
        let rolled = dish_warnings(&[&clean, &troubled]);
        assert_eq!(rolled, vec!["Carbonara: 2 stock problems".to_string()]);
    }
}
