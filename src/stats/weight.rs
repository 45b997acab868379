//! Weight progress
//!
//! Per-entry change against the previous entry, and the latest/first/overall
//! summary shown above the weight log.

use serde::Serialize;

use crate::models::WeightEntry;

#[derive(Debug, Clone, Serialize)]
pub struct WeightRow {
    pub id: i64,
    pub date: String,
    pub weight: f64,
    /// Difference to the previous entry; none for the first
    pub change: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSummary {
    pub latest: f64,
    pub first: f64,
    pub change: f64,
}

/// Entries must already be in chronological order
pub fn weight_rows(entries: &[WeightEntry]) -> Vec<WeightRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| WeightRow {
            id: entry.id,
            date: entry.date.clone(),
            weight: entry.weight,
            change: i.checked_sub(1).map(|prev| entry.weight - entries[prev].weight),
        })
        .collect()
}

pub fn weight_summary(entries: &[WeightEntry]) -> Option<WeightSummary> {
    let first = entries.first()?.weight;
    let latest = entries.last()?.weight;
    Some(WeightSummary {
        latest,
        first,
        change: latest - first,
    })
}
