//! Meal model
//!
//! A saved meal: its food lines and the macro totals computed when it was
//! saved. Meals are never edited after saving.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{with_savepoint, DbError, DbResult};
use crate::nutrition::{MacroBreakdown, UnitKind};
use super::Macros;

/// Meal slot in the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Snacks => "snacks",
            MealCategory::Dinner => "dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealCategory::Breakfast),
            "lunch" => Some(MealCategory::Lunch),
            "snacks" | "snack" => Some(MealCategory::Snacks),
            "dinner" => Some(MealCategory::Dinner),
            _ => None,
        }
    }
}

/// One resolved food line of a saved meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub food_name: String,
    pub quantity: f64,
    pub unit: UnitKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub user_id: i64,
    /// RFC 3339 timestamp in the local offset
    pub date: String,
    pub category: MealCategory,
    pub name: String,
    pub items: Vec<MealItem>,
    pub total_macros: Macros,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub date: String,
    pub category: MealCategory,
    pub name: String,
    pub items: Vec<MealItem>,
    pub total_macros: Macros,
}

impl MealCreate {
    /// Build from a calculator run; items and totals always agree
    pub fn from_breakdown(
        date: String,
        category: MealCategory,
        name: String,
        breakdown: &MacroBreakdown,
    ) -> Self {
        Self {
            date,
            category,
            name,
            items: breakdown
                .items
                .iter()
                .map(|item| MealItem {
                    food_name: item.name.clone(),
                    quantity: item.quantity,
                    unit: item.unit,
                })
                .collect(),
            total_macros: breakdown.totals,
        }
    }
}

/// Conversion failure for a stored text value no enum variant matches
fn unknown_value(row: &Row, column: &str, value: &str) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unknown {}: {}", column, value).into(),
    )
}

impl Meal {
    /// Row without items; callers fill `items`
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category_str: String = row.get("category")?;
        let category = MealCategory::from_str(&category_str)
            .ok_or_else(|| unknown_value(row, "category", &category_str))?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            category,
            name: row.get("name")?,
            items: Vec::new(),
            total_macros: Macros {
                protein: row.get("total_protein")?,
                carbs: row.get("total_carbs")?,
                fats: row.get("total_fats")?,
                calories: row.get("total_calories")?,
            },
        })
    }

    fn item_from_row(row: &Row) -> rusqlite::Result<MealItem> {
        let unit_str: String = row.get("unit")?;
        Ok(MealItem {
            food_name: row.get("food_name")?,
            quantity: row.get("quantity")?,
            unit: UnitKind::from_label(&unit_str)
                .ok_or_else(|| unknown_value(row, "unit", &unit_str))?,
        })
    }

    pub fn create(conn: &Connection, user_id: i64, data: &MealCreate) -> DbResult<Self> {
        let id = with_savepoint(conn, "meal_create", |conn| {
            conn.execute(
                r#"
                INSERT INTO meals (user_id, date, category, name,
                                   total_protein, total_carbs, total_fats, total_calories)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    user_id,
                    data.date,
                    data.category.as_str(),
                    data.name,
                    data.total_macros.protein,
                    data.total_macros.carbs,
                    data.total_macros.fats,
                    data.total_macros.calories,
                ],
            )?;
            let id = conn.last_insert_rowid();

            let mut stmt = conn.prepare(
                r#"
                INSERT INTO meal_items (meal_id, position, food_name, quantity, unit)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for (position, item) in data.items.iter().enumerate() {
                stmt.execute(params![
                    id,
                    position as i64,
                    item.food_name,
                    item.quantity,
                    item.unit.label(),
                ])?;
            }
            Ok(id)
        })?;

        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: i64, id: i64) -> DbResult<Option<Self>> {
        let meal = conn
            .query_row(
                "SELECT * FROM meals WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                Self::from_row,
            )
            .optional()?;

        match meal {
            Some(mut meal) => {
                meal.items = Self::items_for(conn, id)?;
                Ok(Some(meal))
            }
            None => Ok(None),
        }
    }

    fn items_for(conn: &Connection, meal_id: i64) -> DbResult<Vec<MealItem>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meal_items WHERE meal_id = ?1 ORDER BY position")?;
        let items = stmt
            .query_map([meal_id], Self::item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// All meals of a user; no particular order
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE user_id = ?1")?;
        let mut meals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for meal in &mut meals {
            meal.items = Self::items_for(conn, meal.id)?;
        }

        Ok(meals)
    }

    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM meals WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_all_for_user(conn: &Connection, user_id: i64) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM meals WHERE user_id = ?1", [user_id])?)
    }
}
