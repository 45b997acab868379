//! Nutrition module
//!
//! Food reference table and the macro calculator built on it.

pub mod calculator;
pub mod food_table;

pub use calculator::{calculate, BreakdownItem, FoodLine, MacroBreakdown, Quantity};
pub use food_table::{find_food, Food, UnitKind, FOODS};
