//! # gridcalc
//!
//! A spreadsheet evaluation engine.
//!
//! Gridcalc keeps a sparse grid of cells, parses and validates formulas,
//! tracks dependencies between cells, and recalculates exactly the cells
//! affected by each edit.
//!
//! ## Features
//!
//! - Sparse storage: memory scales with occupied cells, not grid area
//! - A1-style formulas with arithmetic, comparisons, `&`, and built-in
//!   functions over cells and ranges
//! - Pre-commit validation: bad syntax, unknown functions, out-of-bounds
//!   references, and circular dependencies reject the edit without
//!   touching the grid
//! - Errors as values: `=10/0` stores `#DIV/0!` and dependents of that
//!   cell compute to the same error
//! - Incremental recalculation in dependency order after every edit
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut engine = Engine::new(3, 3).unwrap();
//!
//! engine.submit("A1".parse().unwrap(), "5").unwrap();
//! engine.submit("B1".parse().unwrap(), "10").unwrap();
//! engine.submit("C1".parse().unwrap(), "=A1+B1").unwrap();
//!
//! let c1 = engine.value(&"C1".parse().unwrap()).unwrap();
//! assert_eq!(c1, CellValue::Number(15.0));
//!
//! // Editing A1 recalculates C1
//! engine.submit("A1".parse().unwrap(), "7").unwrap();
//! let c1 = engine.value(&"C1".parse().unwrap()).unwrap();
//! assert_eq!(c1, CellValue::Number(17.0));
//! ```

pub mod engine;
pub mod prelude;
pub mod render;

pub use engine::{Engine, EngineError, EngineResult};
pub use render::{render, render_window, GridWindow};

// Re-export core types
pub use gridcalc_core::{
    format_number, CellAddress, CellContent, CellError, CellRange, CellValue, Grid, MAX_COLS,
    MAX_ROWS,
};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, parse_formula, CellResolver, DependencyGraph, Expr, FormulaError, Reference,
};
