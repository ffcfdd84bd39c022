//! Error types for the usage value engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading factor tables,
//! resolving calculation methods, and calculating usage values.

use thiserror::Error;

/// The main error type for the usage value engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use vruchtgebruik_engine::error::EngineError;
///
/// let error = EngineError::UnknownMethod {
///     name: "TweeLeven".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown factor method: TweeLeven");
/// assert!(error.is_client_error());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed, but violates an invariant required to serve traffic.
    #[error("Invalid configuration: {message}")]
    ConfigurationInvalid {
        /// A description of the violated invariant.
        message: String,
    },

    /// No calculation method is registered under the requested name.
    #[error("Unknown factor method: {name}")]
    UnknownMethod {
        /// The requested method name.
        name: String,
    },

    /// The adjusted age falls outside every row of the active factor table.
    #[error("No factor found for age {age} in method {method}")]
    NoFactorFound {
        /// The age after sex-based adjustment.
        age: i32,
        /// The method whose table was searched.
        method: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for failures caused by the caller's input.
    ///
    /// Unknown methods and ages outside the configured bands are business-rule
    /// failures; everything else is a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownMethod { .. } | EngineError::NoFactorFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
