//! Error types for configuration and design files.
//!
//! Geometry errors live in [`crate::gears::error`]; the types here cover
//! reading and validating the JSON files the `gear-mesh` tool consumes.

use std::path::PathBuf;

use thiserror::Error;

use crate::gears::GearError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors that can occur while loading or evaluating a gear pair design.
#[derive(Error, Debug)]
pub enum DesignError {
    /// Design file could not be read.
    #[error("failed to read design file: {path}")]
    ReadError {
        /// Path to the design file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Design file could not be parsed.
    #[error("failed to parse design file: {path}")]
    ParseError {
        /// Path to the design file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The design describes an invalid gear or gear pair.
    #[error("invalid gear design")]
    Geometry(#[from] GearError),
}
