//! Formula error types

use gridcalc_core::CellAddress;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that reject a formula before any grid or graph mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Malformed formula text; `position` is a byte offset into the input
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Unknown function name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments for a function
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    /// The formula would create a circular dependency
    ///
    /// The path starts and ends at the offending cell.
    #[error("Circular reference: {}", format_cycle(.path))]
    Cycle { path: Vec<CellAddress> },
}

impl FormulaError {
    /// Syntax error constructor
    pub fn syntax<S: Into<String>>(position: usize, message: S) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
        }
    }
}

fn format_cycle(path: &[CellAddress]) -> String {
    path.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
