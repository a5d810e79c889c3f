//! Configuration management for site-weight
//!
//! This module provides:
//! - .site-weight.toml config file support
//! - Estimator, recommendation, savings, traffic and budget settings

pub mod file;
pub mod loader;

pub use file::{
    ConfigFile, EstimatorSettings, RecommendationSettings, SavingsSettings, TrafficSettings,
    WeightBudget, CONFIG_FILE_NAME,
};
pub use loader::ConfigLoader;
