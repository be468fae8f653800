//! Creation flows: assemble a costed `Recipe` from a draft against current
//! stock, and a priced `Dish` from component recipes. These are the only
//! places the pure metrics, insights and model pieces meet; callers persist
//! the result through a [`Ledger`](crate::store::Ledger) if they keep it.

use chrono::Utc;

use crate::insights;
use crate::metrics::{
    aggregate_recipe_cost, compute_dish_economics, estimate_ingredient_cost, recommended_price,
};
use crate::model::{Dish, DishComponent, IngredientLine, InventoryItem, Recipe, Unit};

/// One user-entered ingredient before costing.
#[derive(Debug, Clone)]
pub struct DraftIngredient {
    /// Inventory item the cost is taken from.
    pub inventory_item_id: i64,
    pub quantity: f64,
    pub unit: Unit,
}

/// User input for a new recipe.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub servings: u32,
    pub ingredients: Vec<DraftIngredient>,
}

/// Costs a draft against the stock on hand. Ingredients whose inventory
/// reference dangles cost zero instead of failing; stock problems become
/// warning strings on the result. The returned recipe has id 0 until a
/// ledger assigns one.
pub fn build_recipe(draft: &RecipeDraft, stock: &[InventoryItem]) -> Recipe {
    let mut lines = Vec::with_capacity(draft.ingredients.len());
    let mut warnings = Vec::new();

    for ingredient in &draft.ingredients {
        let item = stock.iter().find(|i| i.id == ingredient.inventory_item_id);
        let cost = estimate_ingredient_cost(ingredient.quantity, item);
        if let Some(item) = item {
            warnings.extend(insights::ingredient_warnings(ingredient.quantity, item));
            lines.push(IngredientLine {
                catalog_product_id: item.catalog_product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: ingredient.quantity,
                unit: ingredient.unit,
                unit_price: item.unit_price(),
                cost,
            });
        } else {
            lines.push(IngredientLine {
                catalog_product_id: String::new(),
                product_name: String::new(),
                quantity: ingredient.quantity,
                unit: ingredient.unit,
                unit_price: 0.0,
                cost,
            });
        }
    }

    let line_costs: Vec<f64> = lines.iter().map(|l| l.cost).collect();
    let cost = aggregate_recipe_cost(&line_costs, draft.servings);

    Recipe {
        id: 0,
        name: draft.name.clone(),
        servings: draft.servings,
        ingredients: lines,
        total_cost: cost.total_cost,
        cost_per_serving: cost.cost_per_serving,
        warnings,
        insights: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Prices a dish from component recipes, consuming one serving of each.
/// Cost snapshots are taken now; later recipe edits never reprice an
/// existing dish.
pub fn build_dish(
    name: &str,
    sale_price: f64,
    component_recipes: &[&Recipe],
    target_margin: f64,
) -> Dish {
    let components: Vec<DishComponent> = component_recipes
        .iter()
        .map(|recipe| DishComponent {
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            servings: 1,
            cost: recipe.cost_per_serving,
        })
        .collect();

    let component_costs: Vec<f64> = components.iter().map(|c| c.cost).collect();
    let economics = compute_dish_economics(&component_costs, sale_price);
    let recommended = recommended_price(economics.total_cost, target_margin);
    let warnings = insights::dish_warnings(component_recipes);
    let dish_insights = insights::dish_insights(&economics, recommended, !warnings.is_empty());

    Dish {
        id: 0,
        name: name.to_string(),
        components,
        sale_price,
        economics,
        recommended_price: recommended,
        insights: dish_insights,
        warnings,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DEFAULT_TARGET_MARGIN;
    use crate::model::{ProfitStatus, StockStatus};
    use chrono::Duration;

    fn stock_item(id: i64, name: &str, price: f64, quantity: f64) -> InventoryItem {
        let received = Utc::now();
        InventoryItem {
            id,
            catalog_product_id: format!("cat-{id}"),
            product_name: name.into(),
            category: "misc".into(),
            unit: Unit::Grams,
            price,
            quantity,
            received_at: received,
            expires_at: received + Duration::days(30),
            status: StockStatus::InStock,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn recipe_draft_is_costed_from_stock() {
        // flour at 0.0125/g, bacon at 0.09/g
        let stock = vec![
            stock_item(1, "Wheat flour", 25.0, 2000.0),
            stock_item(2, "Bacon", 135.0, 1500.0),
        ];
        let draft = RecipeDraft {
            name: "Test bake".into(),
            servings: 4,
            ingredients: vec![
                DraftIngredient { inventory_item_id: 1, quantity: 200.0, unit: Unit::Grams },
                DraftIngredient { inventory_item_id: 2, quantity: 50.0, unit: Unit::Grams },
            ],
        };
        let recipe = build_recipe(&draft, &stock);
        assert!((recipe.total_cost - 7.0).abs() < 1e-9);
        assert!((recipe.cost_per_serving - 1.75).abs() < 1e-9);
        assert_eq!(recipe.ingredients[1].product_name, "Bacon");
        assert!(recipe.warnings.is_empty());
    }

    #[test]
    fn dangling_ingredient_costs_zero_and_keeps_going() {
        let draft = RecipeDraft {
            name: "Ghost".into(),
            servings: 2,
            ingredients: vec![DraftIngredient {
                inventory_item_id: 99,
                quantity: 100.0,
                unit: Unit::Grams,
            }],
        };
        let recipe = build_recipe(&draft, &[]);
        assert_eq!(recipe.total_cost, 0.0);
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn short_stock_shows_up_as_recipe_warning() {
        let stock = vec![stock_item(1, "Shrimp", 60.0, 100.0)];
        let draft = RecipeDraft {
            name: "Scampi".into(),
            servings: 2,
            ingredients: vec![DraftIngredient {
                inventory_item_id: 1,
                quantity: 400.0,
                unit: Unit::Grams,
            }],
        };
        let recipe = build_recipe(&draft, &stock);
        assert!(recipe.warnings[0].contains("Not enough Shrimp"));
    }

    #[test]
    fn dish_takes_cost_snapshots_and_prices_itself() {
        let stock = vec![stock_item(1, "Bacon", 135.0, 1500.0)];
        let draft = RecipeDraft {
            name: "Carbonara".into(),
            servings: 4,
            ingredients: vec![DraftIngredient {
                inventory_item_id: 1,
                quantity: 200.0,
                unit: Unit::Grams,
            }],
        };
        let mut recipe = build_recipe(&draft, &stock);
        recipe.id = 10;

        let dish = build_dish("Carbonara plate", 29.0, &[&recipe], DEFAULT_TARGET_MARGIN);
        assert_eq!(dish.components[0].recipe_id, 10);
        assert_eq!(dish.components[0].servings, 1);
        assert!((dish.economics.total_cost - recipe.cost_per_serving).abs() < 1e-9);
        assert!(
            (dish.economics.margin + dish.economics.total_cost - 29.0).abs() < 1e-9
        );
        assert_eq!(dish.economics.status, ProfitStatus::Profit);
        assert_eq!(dish.insights, vec!["Healthy profitability".to_string()]);
    }

    #[test]
    fn troubled_recipe_rolls_into_dish_warnings_and_insights() {
        let mut recipe = Recipe {
            id: 3,
            name: "Scampi".into(),
            servings: 2,
            ingredients: Vec::new(),
            total_cost: 20.0,
            cost_per_serving: 10.0,
            warnings: vec!["Not enough Shrimp in stock (needed: 400, have: 100)".into()],
            insights: Vec::new(),
            created_at: Utc::now(),
        };
        recipe.warnings.push("Shrimp expires in a few days".into());

        let dish = build_dish("Scampi plate", 12.0, &[&recipe], DEFAULT_TARGET_MARGIN);
        assert_eq!(dish.warnings, vec!["Scampi: 2 stock problems".to_string()]);
        // 10/12 food cost, margin ~16.7% -> warning tier plus availability hint
        assert_eq!(dish.economics.status, ProfitStatus::Warning);
        assert!(dish.insights.iter().any(|i| i.contains("availability")));
        assert!(dish.insights.iter().any(|i| i.contains("Food cost above 40%")));
    }
}
