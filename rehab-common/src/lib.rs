//! # Rehab Common Library
//!
//! Shared code for the knee rehab habit tracker:
//! - Domain models (exercises, schedules, sessions)
//! - SQLite schema and repositories
//! - Weekly adherence and progress statistics
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod stats;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
