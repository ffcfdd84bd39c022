//! Usage value (vruchtgebruik) calculation engine.
//!
//! This crate computes the usage value of an asset for a person of a given
//! age and sex, using named calculation methods backed by versioned,
//! age-banded factor tables loaded from configuration, and serves the
//! calculation over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
