//! Shared macro totals
//!
//! Used by the food table, meals, and daily summaries.

use serde::{Deserialize, Serialize};

/// Protein, carbs and fats in grams; energy in kcal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
}

impl Macros {
    pub const fn new(protein: f64, carbs: f64, fats: f64, calories: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
            calories,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Multiply every field by `factor`
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fats: self.fats * factor,
            calories: self.calories * factor,
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fats: self.fats + other.fats,
            calories: self.calories + other.calories,
        }
    }
}

impl std::ops::AddAssign for Macros {
    fn add_assign(&mut self, other: Macros) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_scale() {
        let total: Macros = vec![
            Macros::new(1.0, 2.0, 3.0, 40.0),
            Macros::new(0.5, 0.5, 0.5, 10.0),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Macros::new(1.5, 2.5, 3.5, 50.0));
        assert_eq!(total.scale(2.0).calories, 100.0);
    }
}
