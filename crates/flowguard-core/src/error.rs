//! Core error types for flowguard-core.
//!
//! This module defines the error hierarchy using thiserror. Parsers are
//! deliberately fail-soft and rarely surface these; errors mostly come out
//! of configuration handling, file IO and the narrative provider.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flowguard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Narrative provider errors
    #[error("Narrative error: {0}")]
    Narrative(#[from] NarrativeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Config directory could not be resolved
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Errors raised while reading project input files.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input file could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook could not be opened or decoded
    #[error("Failed to open workbook {path}: {message}")]
    WorkbookFailed { path: PathBuf, message: String },

    /// Project snapshot JSON was malformed
    #[error("Invalid project data: {0}")]
    InvalidProject(String),
}

/// Errors raised by the LLM narrative provider. Callers always have a
/// deterministic fallback, so these are reported but never fatal.
#[derive(Error, Debug)]
pub enum NarrativeError {
    /// Request construction or transport failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("Provider returned HTTP {status}")]
    Status { status: u16 },

    /// Provider returned a body the schema does not match
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// No API key configured
    #[error("No API key configured")]
    MissingApiKey,
}
