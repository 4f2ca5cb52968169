//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridcalc-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Grid created with zero or oversized dimensions
    #[error("Invalid grid dimensions: {rows} x {cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    /// Address outside the grid dimensions
    #[error("Cell ({row}, {col}) out of bounds for {rows} x {cols} grid")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),
}
