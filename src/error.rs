//! Error types for radix_merkle

use thiserror::Error;

/// Result type alias for radix_merkle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in radix_merkle operations
///
/// Tree operations themselves never fail; these only surface when a tree is
/// configured, or when two trees are compared.
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid digit split: {0} parts per byte (expected 1, 2, 4 or 8)")]
    InvalidParts(usize),

    #[error("Incompatible trees: {left} parts per byte vs {right}")]
    IncompatibleParts { left: usize, right: usize },

    #[error("Config error: {0}")]
    Config(String),
}
