//! Meal form state
//!
//! The draft holds between one and five food rows. Rows are kept as typed;
//! resolution against the food table happens only when calculating.

use serde::Serialize;

use crate::models::MealCategory;
use crate::nutrition::{calculate, FoodLine, MacroBreakdown, Quantity};

pub const MAX_FOOD_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealDraft {
    pub category: Option<MealCategory>,
    pub name: String,
    pub rows: Vec<FoodLine>,
}

impl Default for MealDraft {
    fn default() -> Self {
        Self {
            category: None,
            name: String::new(),
            rows: vec![blank_row()],
        }
    }
}

fn blank_row() -> FoodLine {
    FoodLine {
        name: String::new(),
        quantity: Quantity::Text(String::new()),
    }
}

impl MealDraft {
    /// Append a blank row; `false` when already full
    pub fn add_row(&mut self) -> bool {
        if self.rows.len() >= MAX_FOOD_ROWS {
            return false;
        }
        self.rows.push(blank_row());
        true
    }

    /// Drop the last row; `false` when only one is left
    pub fn remove_row(&mut self) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        self.rows.pop();
        true
    }

    pub fn set_row(&mut self, index: usize, line: FoodLine) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row = line;
                true
            }
            None => false,
        }
    }

    /// Replace every row at once. An empty list leaves one blank row.
    pub fn set_rows(&mut self, rows: Vec<FoodLine>) -> Result<(), String> {
        if rows.len() > MAX_FOOD_ROWS {
            return Err(format!("A meal holds at most {} food rows", MAX_FOOD_ROWS));
        }
        self.rows = if rows.is_empty() { vec![blank_row()] } else { rows };
        Ok(())
    }

    pub fn breakdown(&self) -> MacroBreakdown {
        calculate(&self.rows)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
