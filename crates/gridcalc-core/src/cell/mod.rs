//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellContent`] - The raw user-entered data at a cell
//! - [`CellValue`] - The computed result of a cell
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`CellStorage`] - Sparse storage for grid cells

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use storage::{CellSlot, CellStorage};
pub use value::{format_number, CellContent, CellError, CellValue};
