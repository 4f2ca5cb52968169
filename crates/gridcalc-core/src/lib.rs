//! # gridcalc-core
//!
//! Core data structures for the gridcalc spreadsheet evaluation engine.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`CellContent`] and [`CellValue`] - what a cell holds vs. what it computes to
//! - [`CellAddress`] and [`CellRange`] - cell addressing and ranges
//! - [`Grid`] - the bounded, sparsely stored two-dimensional grid
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellAddress, CellContent, CellValue, Grid};
//!
//! let mut grid = Grid::new(10, 10).unwrap();
//! let a1 = CellAddress::parse("A1").unwrap();
//!
//! grid.set_content(&a1, CellContent::Number(42.0)).unwrap();
//! grid.set_value(&a1, CellValue::Number(42.0)).unwrap();
//! assert_eq!(grid.value(&a1).unwrap(), CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{
    format_number, CellAddress, CellContent, CellError, CellRange, CellSlot, CellStorage,
    CellValue,
};
pub use error::{Error, Result};
pub use grid::Grid;

/// Maximum number of rows a grid may be created with
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns a grid may be created with
///
/// Wider than Excel's 16,384-column cap; grids of tens of thousands of
/// columns are valid, so both axes share the row limit.
pub const MAX_COLS: u32 = 1_048_576;
