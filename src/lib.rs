//! Lifelog Library
//!
//! Daily tracking of habits, meals, expenses, burned calories and weight.

pub mod auth;
pub mod build_info;
pub mod calendar;
pub mod charts;
pub mod config;
pub mod controller;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod stats;
pub mod tools;
