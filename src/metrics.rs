//! Pure derivation functions: expiry and stock status, recipe cost
//! aggregation, dish economics, and menu-engineering classification.
//!
//! Nothing here touches storage or the clock; callers pass `now` explicitly.
//! Failure is always soft: missing references cost zero, division guards
//! return 0.0, no function panics or returns NaN.

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    DishEconomics, FreshnessStatus, InventoryItem, MenuCategory, ProfitStatus, StockStatus,
};

/// Canonical "expiring soon" cutoff in days. The flows this engine replaces
/// disagreed (2, 3 and 7 all appeared); 3 is the pinned default and every
/// classifier takes the threshold as a parameter.
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: i64 = 3;

/// Margin a recommended price targets when the caller has no opinion.
pub const DEFAULT_TARGET_MARGIN: f64 = 0.35;

/// Expiry date is received date plus the product's shelf life, at day
/// granularity.
pub fn compute_expiry_date(received_at: DateTime<Utc>, shelf_life_days: u32) -> DateTime<Utc> {
    received_at + Duration::days(i64::from(shelf_life_days))
}

/// Whole days until `expires_at`, rounded up. Negative once the expiry
/// moment has passed; 0 means "expires within the current day".
pub fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (expires_at - now).num_seconds();
    let day = 86_400;
    if seconds >= 0 {
        (seconds + day - 1) / day
    } else {
        // ceil for negatives: -1s is still day 0 of being expired
        -((-seconds) / day)
    }
}

/// Expiry-only classification. Expired once the remaining time is negative,
/// expiring within `threshold_days`, fresh otherwise.
pub fn freshness(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    threshold_days: i64,
) -> FreshnessStatus {
    let days = days_until(expires_at, now);
    if days < 0 {
        FreshnessStatus::Expired
    } else if days <= threshold_days {
        FreshnessStatus::Expiring
    } else {
        FreshnessStatus::Fresh
    }
}

/// Combined expiry + quantity classification with human-readable warnings.
///
/// Expiry always takes precedence: an expired or expiring batch keeps that
/// status even when stock is also low. Quantity below 1 base unit is
/// critically low, below 5 is low.
pub fn stock_status(
    expires_at: DateTime<Utc>,
    quantity: f64,
    now: DateTime<Utc>,
) -> (StockStatus, Vec<String>) {
    let mut warnings = Vec::new();
    let mut status = StockStatus::InStock;

    let days = days_until(expires_at, now);
    if days < 0 {
        status = StockStatus::Expired;
        let late = -days;
        warnings.push(format!(
            "Expired {} day{} ago",
            late,
            if late == 1 { "" } else { "s" }
        ));
    } else if days == 0 {
        status = StockStatus::Expiring;
        warnings.push("Expires today".to_string());
    } else if days == 1 {
        status = StockStatus::Expiring;
        warnings.push("Expires tomorrow".to_string());
    } else if days <= DEFAULT_EXPIRY_THRESHOLD_DAYS {
        status = StockStatus::Expiring;
        warnings.push(format!("{days} days left"));
    } else if days <= 7 {
        // advisory only, status stays in-stock
        warnings.push(format!("{days} days left"));
    }

    if quantity < 1.0 {
        if status == StockStatus::InStock {
            status = StockStatus::Low;
        }
        warnings.push("Critically low stock".to_string());
    } else if quantity < 5.0 && status == StockStatus::InStock {
        status = StockStatus::Low;
    }

    (status, warnings)
}

/// Cost of using `quantity` base units of an inventory item. A missing or
/// empty batch contributes nothing; a dangling reference must never crash a
/// recipe preview.
pub fn estimate_ingredient_cost(quantity: f64, item: Option<&InventoryItem>) -> f64 {
    match item {
        Some(item) => quantity * item.unit_price(),
        None => {
            log::warn!("ingredient references no inventory item, costing 0");
            0.0
        }
    }
}

/// Recipe cost totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeCost {
    pub total_cost: f64,
    pub cost_per_serving: f64,
}

/// Sums ingredient line costs and divides across servings. Input validation
/// keeps servings >= 1 upstream; servings 0 still yields a defined 0.0 rather
/// than an infinity reaching the UI.
pub fn aggregate_recipe_cost(line_costs: &[f64], servings: u32) -> RecipeCost {
    let total_cost: f64 = line_costs.iter().sum();
    let cost_per_serving = if servings > 0 {
        total_cost / f64::from(servings)
    } else {
        log::debug!("recipe with zero servings, cost per serving forced to 0");
        0.0
    };
    RecipeCost {
        total_cost,
        cost_per_serving,
    }
}

/// Margin, food cost and profitability tier for a dish. Sale price <= 0 is a
/// validation error upstream; the percentages degrade to 0.0 here instead of
/// dividing by zero.
pub fn compute_dish_economics(component_costs: &[f64], sale_price: f64) -> DishEconomics {
    let total_cost: f64 = component_costs.iter().sum();
    let margin = sale_price - total_cost;
    let (margin_percent, food_cost_percent) = if sale_price > 0.0 {
        (margin / sale_price * 100.0, total_cost / sale_price * 100.0)
    } else {
        log::debug!("dish with non-positive sale price, percentages forced to 0");
        (0.0, 0.0)
    };
    DishEconomics {
        total_cost,
        margin,
        margin_percent,
        food_cost_percent,
        status: profit_status(margin_percent),
    }
}

/// Profitability tier. Lower bounds are inclusive: exactly 25% is profit,
/// exactly 15% is warning.
pub fn profit_status(margin_percent: f64) -> ProfitStatus {
    if margin_percent >= 25.0 {
        ProfitStatus::Profit
    } else if margin_percent >= 15.0 {
        ProfitStatus::Warning
    } else {
        ProfitStatus::Loss
    }
}

/// Price that would hit `target_margin` on the given cost:
/// cost / (1 - margin). Margins at or above 100% are clamped to 99% so the
/// result stays finite and positive.
pub fn recommended_price(total_cost: f64, target_margin: f64) -> f64 {
    let margin = target_margin.clamp(0.0, 0.99);
    total_cost / (1.0 - margin)
}

/// Menu-engineering tier from food-cost percent alone: < 30 star, < 40 cash
/// cow, < 55 question, dog otherwise. Total over all reals; out-of-range
/// inputs fall into the nearest tier.
pub fn classify_menu_category(food_cost_percent: f64) -> MenuCategory {
    if food_cost_percent < 30.0 {
        MenuCategory::Star
    } else if food_cost_percent < 40.0 {
        MenuCategory::CashCow
    } else if food_cost_percent < 55.0 {
        MenuCategory::Question
    } else {
        MenuCategory::Dog
    }
}
