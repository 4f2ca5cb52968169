//! The bounded grid

use crate::cell::{CellAddress, CellContent, CellRange, CellSlot, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A two-dimensional grid of cells with fixed dimensions
///
/// Dimensions are set once at construction and never change. Storage is
/// sparse: untouched cells consume no memory and read back as
/// `Empty` content / `Empty` value.
#[derive(Debug)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: CellStorage,
}

impl Grid {
    /// Create a grid with the given dimensions, all cells empty
    ///
    /// Fails with [`Error::InvalidDimensions`] if either dimension is zero
    /// or exceeds the addressing limits.
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 || rows > MAX_ROWS || cols > MAX_COLS {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        Ok(Self {
            rows,
            cols,
            cells: CellStorage::new(),
        })
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Check an address against the grid dimensions
    pub fn check_bounds(&self, addr: &CellAddress) -> Result<()> {
        if addr.row >= self.rows || addr.col >= self.cols {
            return Err(Error::OutOfBounds {
                row: addr.row,
                col: addr.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Get a cell's content
    pub fn content(&self, addr: &CellAddress) -> Result<CellContent> {
        self.check_bounds(addr)?;
        Ok(self
            .cells
            .get(addr.row, addr.col)
            .map(|slot| slot.content.clone())
            .unwrap_or(CellContent::Empty))
    }

    /// Get a cell's computed value
    pub fn value(&self, addr: &CellAddress) -> Result<CellValue> {
        self.check_bounds(addr)?;
        Ok(self.value_unchecked(addr))
    }

    /// Get a cell's computed value without a bounds check
    ///
    /// Used on hot evaluation paths where the address was validated when
    /// the formula was accepted.
    pub fn value_unchecked(&self, addr: &CellAddress) -> CellValue {
        self.cells
            .get(addr.row, addr.col)
            .map(|slot| slot.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Set a cell's content
    pub fn set_content(&mut self, addr: &CellAddress, content: CellContent) -> Result<()> {
        self.check_bounds(addr)?;
        self.cells.set_content(addr.row, addr.col, content);
        Ok(())
    }

    /// Set a cell's computed value
    pub fn set_value(&mut self, addr: &CellAddress, value: CellValue) -> Result<()> {
        self.check_bounds(addr)?;
        self.cells.set_value(addr.row, addr.col, value);
        Ok(())
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Bounds of populated cells, or None if the grid is untouched
    pub fn used_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.cells.used_bounds()
    }

    /// Values of the populated cells inside `range`, in row order
    ///
    /// Untouched cells are skipped entirely, so the cost of a range
    /// covering millions of addresses is proportional to its populated
    /// cells.
    pub fn values_in_range(&self, range: &CellRange) -> impl Iterator<Item = &CellValue> {
        self.cells
            .iter_range(range.start.row, range.start.col, range.end.row, range.end.col)
            .map(|(_, _, slot)| &slot.value)
    }

    /// Iterate over populated cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &CellSlot)> {
        self.cells
            .iter()
            .map(|(row, col, slot)| (CellAddress::new(row, col), slot))
    }

    /// Clear all cells, keeping the dimensions
    pub fn reset(&mut self) {
        self.cells.clear();
    }
}
