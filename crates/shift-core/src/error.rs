//! Error types for shift-core

use thiserror::Error;

/// Core error type for schema-shift
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Requested database has no section in the configuration
    #[error("[C004] Database '{name}' not found in the configuration file. Available: {available}")]
    DatabaseNotFound { name: String, available: String },

    /// C005: A path referenced by the configuration does not exist
    #[error("[C005] The {what} was not found at {path}")]
    PathNotFound { what: &'static str, path: String },

    /// C006: Version string does not follow the `NNN_name` convention
    #[error("[C006] Invalid migration version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
