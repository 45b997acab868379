//! Food table listing

use serde::Serialize;

use crate::nutrition::{Food, UnitKind, FOODS};

#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub name: &'static str,
    pub unit: &'static str,
    /// What the macro values are measured against
    pub per: &'static str,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
}

#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub count: usize,
    pub foods: Vec<FoodSummary>,
}

fn per_label(unit: UnitKind) -> &'static str {
    match unit {
        UnitKind::Count => "1 item",
        UnitKind::MassGrams => "100 g",
        UnitKind::VolumeMl => "100 ml",
    }
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            name: food.name,
            unit: food.unit.label(),
            per: per_label(food.unit),
            protein: food.macros.protein,
            carbs: food.macros.carbs,
            fats: food.macros.fats,
            calories: food.macros.calories,
        }
    }
}

/// Foods whose name contains `query` (case-insensitive); all when `None`
pub fn list_foods(query: Option<&str>) -> ListFoodsResponse {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    let foods: Vec<FoodSummary> = FOODS
        .iter()
        .filter(|f| needle.is_empty() || f.name.to_lowercase().contains(&needle))
        .map(FoodSummary::from)
        .collect();

    ListFoodsResponse {
        count: foods.len(),
        foods,
    }
}
