//! Food reference table
//!
//! The fixed list of foods the meal form understands. Mass and volume foods
//! carry macros per 100 units; countable foods carry macros per item.

use serde::{Deserialize, Serialize};

use crate::models::Macros;

/// How a food's quantity is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Per item (eggs, slices, scoops)
    Count,
    /// Per 100 grams
    MassGrams,
    /// Per 100 milliliters
    VolumeMl,
}

impl UnitKind {
    /// Short label shown next to a quantity and stored with meal items
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Count => "qty",
            UnitKind::MassGrams => "g",
            UnitKind::VolumeMl => "ml",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "qty" | "count" => Some(UnitKind::Count),
            "g" | "grams" => Some(UnitKind::MassGrams),
            "ml" => Some(UnitKind::VolumeMl),
            _ => None,
        }
    }

    /// Multiplier applied to the table macros for `quantity` of this unit
    pub fn scale_factor(&self, quantity: f64) -> f64 {
        match self {
            UnitKind::Count => quantity,
            UnitKind::MassGrams | UnitKind::VolumeMl => quantity / 100.0,
        }
    }
}

/// One row of the reference table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Food {
    pub name: &'static str,
    pub unit: UnitKind,
    pub macros: Macros,
}

const fn food(name: &'static str, unit: UnitKind, protein: f64, carbs: f64, fats: f64, calories: f64) -> Food {
    Food {
        name,
        unit,
        macros: Macros::new(protein, carbs, fats, calories),
    }
}

pub static FOODS: &[Food] = &[
    food("Chicken Breast (Cooked)", UnitKind::MassGrams, 31.0, 0.0, 3.6, 165.0),
    food("Chicken Breast (Raw)", UnitKind::MassGrams, 23.0, 0.0, 1.2, 110.0),
    food("Rice (White, Cooked)", UnitKind::MassGrams, 2.7, 28.0, 0.3, 130.0),
    food("Egg (Whole)", UnitKind::Count, 6.3, 0.4, 5.0, 72.0),
    food("Egg Whites", UnitKind::Count, 3.6, 0.2, 0.0, 17.0),
    food("Whey Protein (Scoop)", UnitKind::Count, 24.0, 3.0, 1.0, 117.0),
    food("Milk (Whole)", UnitKind::VolumeMl, 3.2, 4.8, 3.3, 61.0),
    food("Oats (Raw)", UnitKind::MassGrams, 11.8, 68.5, 9.5, 407.0),
    food("Banana", UnitKind::Count, 1.3, 27.0, 0.4, 105.0),
    food("Apple", UnitKind::Count, 0.5, 25.0, 0.3, 95.0),
    food("Peanut Butter", UnitKind::MassGrams, 25.0, 20.0, 50.0, 588.0),
    food("Bread (Slice)", UnitKind::Count, 3.0, 15.0, 1.0, 80.0),
];

/// Case-insensitive exact lookup by name
pub fn find_food(name: &str) -> Option<&'static Food> {
    let wanted = name.trim();
    FOODS.iter().find(|f| f.name.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_food_ignores_case() {
        let food = find_food("banana").unwrap();
        assert_eq!(food.name, "Banana");
        assert_eq!(food.unit, UnitKind::Count);
        assert!(find_food("rice (white, cooked)").is_some());
        assert!(find_food("Pizza").is_none());
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(UnitKind::Count.scale_factor(2.0), 2.0);
        assert_eq!(UnitKind::MassGrams.scale_factor(150.0), 1.5);
        assert_eq!(UnitKind::VolumeMl.scale_factor(250.0), 2.5);
    }

    #[test]
    fn test_labels_round_trip() {
        for kind in [UnitKind::Count, UnitKind::MassGrams, UnitKind::VolumeMl] {
            assert_eq!(UnitKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(UnitKind::from_label("cup"), None);
    }

    #[test]
    fn test_table_names_are_unique() {
        for (i, a) in FOODS.iter().enumerate() {
            for b in &FOODS[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name));
            }
        }
    }
}
