//! Lifelog Tools module
//!
//! Tool helpers that do not go through the view controller.

pub mod foods;
pub mod status;
