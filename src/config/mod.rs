//! Configuration management for the league-elo engine
//!
//! This module handles all configuration loading from environment variables,
//! TOML files, validation, and default values for a rating run.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ReportSettings, ServiceSettings};
pub use rating::{RatingConfig, MAX_RATING_MAGNITUDE};
