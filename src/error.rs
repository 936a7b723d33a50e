//! Error types for sigmoid-nn.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the matrix engine, network engine, and data loaders can report.
#[derive(Error, Debug)]
pub enum Error {
    /// Binary operation between matrices whose shapes do not line up
    #[error("shape mismatch in {op}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Element access outside the declared rows/columns
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Scalar division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Matrix with a zero row or column count
    #[error("matrix dimensions must be at least 1x1, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },

    /// Row data of unequal lengths
    #[error("row {row} has {len} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Layer-size sequence or parameter set that cannot form a network
    #[error("invalid network structure: {0}")]
    InvalidStructure(String),

    /// Input or target vector that does not fit the network
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed dataset
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
