//! Error types for the SPM threshold engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading reference data,
//! computing thresholds, or exporting data files.

use thiserror::Error;

/// The main error type for the SPM threshold engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use spm_threshold::error::EngineError;
///
/// let error = EngineError::UnknownLocation {
///     kind: "state".to_string(),
///     key: "ZZ".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown state: ZZ");
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

    /// Configuration parsed but violates a reference-data invariant.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated invariant.
        message: String,
    },

    /// A caller-supplied value is outside what the engine supports.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A cost-level key or state code is not present in the reference tables.
    #[error("Unknown {kind}: {key}")]
    UnknownLocation {
        /// The kind of location that was looked up ("cost level" or "state").
        kind: String,
        /// The key or code that was not found.
        key: String,
    },

    /// Writing an export file failed.
    #[error("Failed to export '{path}': {message}")]
    ExportError {
        /// The file or directory being written.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
