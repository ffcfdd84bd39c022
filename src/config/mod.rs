//! Configuration loading and management for the usage value engine.
//!
//! This module provides functionality to load the age adjustment policy and
//! the versioned factor tables of each calculation method from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use vruchtgebruik_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("Female adjustment: {}", loader.age_factor().female_adjustment);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AgeAdjustmentPolicy, FactorRow, MethodSettings, ServiceConfig};
