//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Engine
    Engine,
    EngineError,
    EngineResult,

    // Cell types
    CellAddress,
    CellContent,
    CellError,
    CellRange,
    CellValue,

    // Grid
    Grid,
    MAX_COLS,
    MAX_ROWS,

    // Rendering
    render,
    render_window,
    GridWindow,

    // Formula types
    FormulaError,
};
