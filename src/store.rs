//! Repository layer. The metrics functions stay pure; callers hold a
//! `Ledger` and hand its records to the engine. Two implementations: an
//! in-memory ledger for previews and tests, and a SQLite-backed one for
//! persistence.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::LedgerError;
use crate::model::{Dish, InventoryItem, Recipe};

type Result<T> = std::result::Result<T, LedgerError>;

/// CRUD surface over the three entity kinds. Recipes and dishes are
/// immutable after creation apart from deletion; inventory additionally
/// supports quantity/price correction.
pub trait Ledger {
    /// Stores a received batch. The id on the passed record is ignored;
    /// the assigned id is returned.
    fn add_inventory(&self, item: &InventoryItem) -> Result<i64>;
    fn inventory(&self, id: i64) -> Result<InventoryItem>;
    fn list_inventory(&self) -> Result<Vec<InventoryItem>>;
    /// Quantity/price correction, the only mutation inventory supports.
    fn correct_inventory(&self, id: i64, quantity: f64, price: f64) -> Result<()>;
    fn remove_inventory(&self, id: i64) -> Result<()>;

    fn add_recipe(&self, recipe: &Recipe) -> Result<i64>;
    fn recipe(&self, id: i64) -> Result<Recipe>;
    fn list_recipes(&self) -> Result<Vec<Recipe>>;
    fn remove_recipe(&self, id: i64) -> Result<()>;

    fn add_dish(&self, dish: &Dish) -> Result<i64>;
    fn dish(&self, id: i64) -> Result<Dish>;
    fn list_dishes(&self) -> Result<Vec<Dish>>;
    fn remove_dish(&self, id: i64) -> Result<()>;
}

// --- In-memory ledger ---

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    inventory: Vec<InventoryItem>,
    recipes: Vec<Recipe>,
    dishes: Vec<Dish>,
}

/// Vec-backed ledger. Replaces the mutable module-level mock arrays the
/// original application used as a fake database.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<MemoryState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }
}

impl Ledger for MemoryLedger {
    fn add_inventory(&self, item: &InventoryItem) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let mut stored = item.clone();
        stored.id = id;
        state.inventory.push(stored);
        Ok(id)
    }

    fn inventory(&self, id: i64) -> Result<InventoryItem> {
        let state = self.state.lock().unwrap();
        state
            .inventory
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("inventory item", id))
    }

    fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.state.lock().unwrap().inventory.clone())
    }

    fn correct_inventory(&self, id: i64, quantity: f64, price: f64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let item = state
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found("inventory item", id))?;
        item.quantity = quantity;
        item.price = price;
        Ok(())
    }

    fn remove_inventory(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.inventory.len();
        state.inventory.retain(|i| i.id != id);
        if state.inventory.len() == before {
            return Err(LedgerError::not_found("inventory item", id));
        }
        Ok(())
    }

    fn add_recipe(&self, recipe: &Recipe) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let mut stored = recipe.clone();
        stored.id = id;
        state.recipes.push(stored);
        Ok(id)
    }

    fn recipe(&self, id: i64) -> Result<Recipe> {
        let state = self.state.lock().unwrap();
        state
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("recipe", id))
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.state.lock().unwrap().recipes.clone())
    }

    fn remove_recipe(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        if state.recipes.len() == before {
            return Err(LedgerError::not_found("recipe", id));
        }
        Ok(())
    }

    fn add_dish(&self, dish: &Dish) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let mut stored = dish.clone();
        stored.id = id;
        state.dishes.push(stored);
        Ok(id)
    }

    fn dish(&self, id: i64) -> Result<Dish> {
        let state = self.state.lock().unwrap();
        state
            .dishes
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("dish", id))
    }

    fn list_dishes(&self) -> Result<Vec<Dish>> {
        Ok(self.state.lock().unwrap().dishes.clone())
    }

    fn remove_dish(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.dishes.len();
        state.dishes.retain(|d| d.id != id);
        if state.dishes.len() == before {
            return Err(LedgerError::not_found("dish", id));
        }
        Ok(())
    }
}

// --- SQLite ledger ---

/// SQLite-backed ledger. Nested lists (ingredient lines, components,
/// warnings) are stored as JSON columns; scalars get their own columns.
#[derive(Clone)]
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedger {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS inventory_items (
                id INTEGER PRIMARY KEY,
                catalog_product_id TEXT NOT NULL,
                product_name TEXT NOT NULL,
                category TEXT NOT NULL,
                unit TEXT NOT NULL,
                price REAL NOT NULL,
                quantity REAL NOT NULL,
                received_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                status TEXT NOT NULL,
                warnings_json TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                servings INTEGER NOT NULL,
                ingredients_json TEXT NOT NULL,
                total_cost REAL NOT NULL,
                cost_per_serving REAL NOT NULL,
                warnings_json TEXT NOT NULL,
                insights_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS dishes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                components_json TEXT NOT NULL,
                sale_price REAL NOT NULL,
                economics_json TEXT NOT NULL,
                recommended_price REAL NOT NULL,
                insights_json TEXT NOT NULL,
                warnings_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(SqliteLedger {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> std::result::Result<String, rusqlite::Error> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn json_col<T: serde::de::DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn time_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        catalog_product_id: row.get(1)?,
        product_name: row.get(2)?,
        category: row.get(3)?,
        unit: json_col(row, 4)?,
        price: row.get(5)?,
        quantity: row.get(6)?,
        received_at: time_col(row, 7)?,
        expires_at: time_col(row, 8)?,
        status: json_col(row, 9)?,
        warnings: json_col(row, 10)?,
    })
}

fn row_to_recipe(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        servings: row.get(2)?,
        ingredients: json_col(row, 3)?,
        total_cost: row.get(4)?,
        cost_per_serving: row.get(5)?,
        warnings: json_col(row, 6)?,
        insights: json_col(row, 7)?,
        created_at: time_col(row, 8)?,
    })
}

fn row_to_dish(row: &Row<'_>) -> rusqlite::Result<Dish> {
    Ok(Dish {
        id: row.get(0)?,
        name: row.get(1)?,
        components: json_col(row, 2)?,
        sale_price: row.get(3)?,
        economics: json_col(row, 4)?,
        recommended_price: row.get(5)?,
        insights: json_col(row, 6)?,
        warnings: json_col(row, 7)?,
        created_at: time_col(row, 8)?,
    })
}

impl Ledger for SqliteLedger {
    fn add_inventory(&self, item: &InventoryItem) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO inventory_items (catalog_product_id, product_name, category, unit,
                price, quantity, received_at, expires_at, status, warnings_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                item.catalog_product_id,
                item.product_name,
                item.category,
                to_json(&item.unit)?,
                item.price,
                item.quantity,
                item.received_at.to_rfc3339(),
                item.expires_at.to_rfc3339(),
                to_json(&item.status)?,
                to_json(&item.warnings)?,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn inventory(&self, id: i64) -> Result<InventoryItem> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, catalog_product_id, product_name, category, unit, price, quantity,
                    received_at, expires_at, status, warnings_json
             FROM inventory_items WHERE id = ?1",
        )?;
        stmt.query_row(params![id], row_to_item)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    LedgerError::not_found("inventory item", id)
                }
                other => other.into(),
            })
    }

    fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, catalog_product_id, product_name, category, unit, price, quantity,
                    received_at, expires_at, status, warnings_json
             FROM inventory_items ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_item)?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn correct_inventory(&self, id: i64, quantity: f64, price: f64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE inventory_items SET quantity = ?1, price = ?2 WHERE id = ?3",
            params![quantity, price, id],
        )?;
        if changed == 0 {
            return Err(LedgerError::not_found("inventory item", id));
        }
        Ok(())
    }

    fn remove_inventory(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM inventory_items WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(LedgerError::not_found("inventory item", id));
        }
        Ok(())
    }

    fn add_recipe(&self, recipe: &Recipe) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO recipes (name, servings, ingredients_json, total_cost,
                cost_per_serving, warnings_json, insights_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                recipe.name,
                recipe.servings,
                to_json(&recipe.ingredients)?,
                recipe.total_cost,
                recipe.cost_per_serving,
                to_json(&recipe.warnings)?,
                to_json(&recipe.insights)?,
                recipe.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn recipe(&self, id: i64) -> Result<Recipe> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, servings, ingredients_json, total_cost, cost_per_serving,
                    warnings_json, insights_json, created_at
             FROM recipes WHERE id = ?1",
        )?;
        stmt.query_row(params![id], row_to_recipe)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => LedgerError::not_found("recipe", id),
                other => other.into(),
            })
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, servings, ingredients_json, total_cost, cost_per_serving,
                    warnings_json, insights_json, created_at
             FROM recipes ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_recipe)?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn remove_recipe(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(LedgerError::not_found("recipe", id));
        }
        Ok(())
    }

    fn add_dish(&self, dish: &Dish) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO dishes (name, components_json, sale_price, economics_json,
                recommended_price, insights_json, warnings_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                dish.name,
                to_json(&dish.components)?,
                dish.sale_price,
                to_json(&dish.economics)?,
                dish.recommended_price,
                to_json(&dish.insights)?,
                to_json(&dish.warnings)?,
                dish.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn dish(&self, id: i64) -> Result<Dish> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, components_json, sale_price, economics_json,
                    recommended_price, insights_json, warnings_json, created_at
             FROM dishes WHERE id = ?1",
        )?;
        stmt.query_row(params![id], row_to_dish).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => LedgerError::not_found("dish", id),
            other => other.into(),
        })
    }

    fn list_dishes(&self) -> Result<Vec<Dish>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, components_json, sale_price, economics_json,
                    recommended_price, insights_json, warnings_json, created_at
             FROM dishes ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_dish)?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn remove_dish(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM dishes WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(LedgerError::not_found("dish", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_dish_economics;
    use crate::model::{DishComponent, IngredientLine, StockStatus, Unit};
    use chrono::{Duration, Utc};
    use tempfile::NamedTempFile;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample_item() -> InventoryItem {
        let received = Utc::now();
        InventoryItem {
            id: 0,
            catalog_product_id: "dairy-001".into(),
            product_name: "Cream 30%".into(),
            category: "dairy".into(),
            unit: Unit::Milliliters,
            price: 12.5,
            quantity: 2000.0,
            received_at: received,
            expires_at: received + Duration::days(5),
            status: StockStatus::InStock,
            warnings: vec!["5 days left".into()],
        }
    }

    fn sample_recipe() -> Recipe {
        Recipe {
            id: 0,
            name: "Carbonara".into(),
            servings: 4,
            ingredients: vec![IngredientLine {
                catalog_product_id: "meat-001".into(),
                product_name: "Bacon".into(),
                quantity: 200.0,
                unit: Unit::Grams,
                unit_price: 0.03,
                cost: 6.0,
            }],
            total_cost: 6.0,
            cost_per_serving: 1.5,
            warnings: Vec::new(),
            insights: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn sample_dish(recipe_id: i64) -> Dish {
        Dish {
            id: 0,
            name: "Carbonara plate".into(),
            components: vec![DishComponent {
                recipe_id,
                recipe_name: "Carbonara".into(),
                servings: 1,
                cost: 1.5,
            }],
            sale_price: 29.0,
            economics: compute_dish_economics(&[1.5], 29.0),
            recommended_price: 2.31,
            insights: vec!["Healthy profitability".into()],
            warnings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn exercise_ledger(ledger: &dyn Ledger) {
        // inventory lifecycle: receive, correct, dispose
        let id = ledger.add_inventory(&sample_item()).unwrap();
        let stored = ledger.inventory(id).unwrap();
        assert_eq!(stored.product_name, "Cream 30%");
        assert_eq!(stored.warnings, vec!["5 days left".to_string()]);

        ledger.correct_inventory(id, 1500.0, 10.0).unwrap();
        let corrected = ledger.inventory(id).unwrap();
        assert_eq!(corrected.quantity, 1500.0);
        assert_eq!(corrected.price, 10.0);

        // recipe and dish are create/read/delete only
        let recipe_id = ledger.add_recipe(&sample_recipe()).unwrap();
        let recipe = ledger.recipe(recipe_id).unwrap();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].unit, Unit::Grams);

        let dish_id = ledger.add_dish(&sample_dish(recipe_id)).unwrap();
        let dish = ledger.dish(dish_id).unwrap();
        assert_eq!(dish.components[0].recipe_id, recipe_id);
        assert_eq!(dish.economics.status, crate::model::ProfitStatus::Profit);
        assert_eq!(ledger.list_dishes().unwrap().len(), 1);

        ledger.remove_dish(dish_id).unwrap();
        ledger.remove_recipe(recipe_id).unwrap();
        ledger.remove_inventory(id).unwrap();
        assert!(ledger.list_inventory().unwrap().is_empty());
        assert!(matches!(
            ledger.inventory(id),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn memory_ledger_round_trip() {
        init_logging();
        exercise_ledger(&MemoryLedger::new());
    }

    #[test]
    fn sqlite_ledger_round_trip() {
        init_logging();
        let file = NamedTempFile::new().unwrap();
        let ledger = SqliteLedger::open(file.path()).unwrap();
        exercise_ledger(&ledger);
    }

    #[test]
    fn sqlite_ledger_persists_across_reopen() {
        let file = NamedTempFile::new().unwrap();
        let id = {
            let ledger = SqliteLedger::open(file.path()).unwrap();
            ledger.add_inventory(&sample_item()).unwrap()
        };
        let reopened = SqliteLedger::open(file.path()).unwrap();
        let item = reopened.inventory(id).unwrap();
        assert_eq!(item.unit, Unit::Milliliters);
        assert_eq!(item.status, StockStatus::InStock);
    }

    #[test]
    fn missing_rows_surface_not_found() {
        let file = NamedTempFile::new().unwrap();
        let ledger = SqliteLedger::open(file.path()).unwrap();
        assert!(matches!(
            ledger.recipe(42),
            Err(LedgerError::NotFound { entity: "recipe", id: 42 })
        ));
        assert!(matches!(
            ledger.correct_inventory(42, 1.0, 1.0),
            Err(LedgerError::NotFound { .. })
        ));
    }
}
