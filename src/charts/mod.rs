//! Charts module
//!
//! Consistency and weight charts rendered to PNG.

pub mod geometry;
pub mod render;

pub use render::{
    render_consistency_chart, render_weight_chart, save_png, ChartError, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};
