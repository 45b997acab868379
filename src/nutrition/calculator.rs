//! Macro calculator
//!
//! Resolves free-form (food, quantity) lines against the reference table.
//! Lines that do not resolve contribute nothing; there is no error path.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::food_table::{find_food, UnitKind};
use crate::models::Macros;

/// A quantity as typed into a form: either a number or raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Usable amount, or `None` when missing, non-numeric, or not positive
    pub fn amount(&self) -> Option<f64> {
        let value = match self {
            Quantity::Number(n) => *n,
            Quantity::Text(s) => parse_leading_number(s)?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

impl From<f64> for Quantity {
    fn from(n: f64) -> Self {
        Quantity::Number(n)
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::Text(s.to_string())
    }
}

/// Parse the numeric prefix of `s` ("150g" -> 150, " 2.5 " -> 2.5)
pub fn parse_leading_number(s: &str) -> Option<f64> {
    lazy_static! {
        static ref LEADING_NUMBER: Regex =
            Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
    }
    let m = LEADING_NUMBER.find(s)?;
    m.as_str().trim().parse().ok()
}

/// One row of user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLine {
    pub name: String,
    pub quantity: Quantity,
}

impl FoodLine {
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

/// Contribution of one resolved line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    /// Canonical table name
    pub name: String,
    pub quantity: f64,
    pub unit: UnitKind,
    /// Rounded kcal for display
    pub calories: i64,
    pub macros: Macros,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub items: Vec<BreakdownItem>,
    /// Unrounded totals
    pub totals: Macros,
}

impl MacroBreakdown {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolve every line and total the macros
pub fn calculate(lines: &[FoodLine]) -> MacroBreakdown {
    let mut breakdown = MacroBreakdown::default();

    for line in lines {
        let Some(food) = find_food(&line.name) else {
            continue;
        };
        let Some(quantity) = line.quantity.amount() else {
            continue;
        };

        let macros = food.macros.scale(food.unit.scale_factor(quantity));
        breakdown.totals += macros;
        breakdown.items.push(BreakdownItem {
            name: food.name.to_string(),
            quantity,
            unit: food.unit,
            calories: macros.calories.round() as i64,
            macros,
        });
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_count_unit_scales_by_quantity() {
        let result = calculate(&[FoodLine::new("Banana", 2.0)]);
        assert_eq!(result.items.len(), 1);
        assert!(close(result.totals.calories, 210.0));
        assert!(close(result.totals.protein, 2.6));
        assert_eq!(result.items[0].calories, 210);
        assert_eq!(result.items[0].unit, UnitKind::Count);
    }

    #[test]
    fn test_mass_unit_scales_per_hundred() {
        let result = calculate(&[FoodLine::new("Rice (White, Cooked)", "150")]);
        assert!(close(result.totals.calories, 195.0));
        assert!(close(result.totals.carbs, 42.0));
        assert_eq!(result.items[0].quantity, 150.0);
    }

    #[test]
    fn test_unknown_and_invalid_lines_are_skipped() {
        let result = calculate(&[
            FoodLine::new("Pizza", 1.0),
            FoodLine::new("Apple", 0.0),
            FoodLine::new("Apple", -1.0),
            FoodLine::new("Apple", "abc"),
            FoodLine::new("Apple", ""),
            FoodLine::new("apple", "1"),
        ]);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "Apple");
        assert!(close(result.totals.calories, 95.0));
    }

    #[test]
    fn test_totals_stay_unrounded() {
        let result = calculate(&[
            FoodLine::new("Milk (Whole)", 250.0),
            FoodLine::new("Egg (Whole)", 3.0),
        ]);
        assert!(close(result.totals.calories, 152.5 + 216.0));
        assert_eq!(result.items[0].calories, 153);
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let lines = vec![
            FoodLine::new("Oats (Raw)", 80.0),
            FoodLine::new("Peanut Butter", "32g"),
        ];
        assert_eq!(calculate(&lines), calculate(&lines));
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("150g"), Some(150.0));
        assert_eq!(parse_leading_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("1e2"), Some(100.0));
        assert_eq!(parse_leading_number("g150"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_quantity_deserializes_from_number_or_text() {
        let n: Quantity = serde_json::from_str("2").unwrap();
        let t: Quantity = serde_json::from_str("\"150\"").unwrap();
        assert_eq!(n.amount(), Some(2.0));
        assert_eq!(t.amount(), Some(150.0));
    }
}
