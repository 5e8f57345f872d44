/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across the crate
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Slot pool errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PoolError {
    #[error("Statement pool exhausted: all {capacity} slots are claimed")]
    #[diagnostic(
        code(pool::exhausted),
        help("Release finished statements or raise STMT_POOL_CAPACITY.")
    )]
    Exhausted { capacity: usize },
}

/// Position token errors
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum PositionError {
    #[error("Invalid position token: expected {expected} bytes, got {actual} bytes")]
    #[diagnostic(
        code(position::invalid_length),
        help("Position tokens must be replayed exactly as they were produced.")
    )]
    InvalidLength { expected: usize, actual: usize },

    #[error("Position {index} is outside the pool (capacity {capacity})")]
    #[diagnostic(
        code(position::out_of_range),
        help("The token was produced for a larger pool.")
    )]
    OutOfRange { index: u32, capacity: usize },

    #[error("Position encoding failed: {context}")]
    #[diagnostic(code(position::codec))]
    Codec {
        context: &'static str,
        #[source]
        source: Box<bincode::ErrorKind>,
    },
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid pool capacity: {0}")]
    #[diagnostic(
        code(config::invalid_capacity),
        help("Capacity must be between 1 and 4294967295.")
    )]
    InvalidCapacity(usize),

    #[error("Cannot parse {var}: {value:?}")]
    #[diagnostic(
        code(config::parse_failed),
        help("Use a plain decimal integer.")
    )]
    Parse { var: String, value: String },
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum MonitorError {
    #[error("Pool error: {0}")]
    #[diagnostic(transparent)]
    Pool(#[from] PoolError),

    #[error("Position error: {0}")]
    #[diagnostic(transparent)]
    Position(#[from] PositionError),

    #[error("Config error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
