//! Grid rendering
//!
//! Produces display strings only: numbers in canonical decimal form,
//! text as-is, error tags like `#DIV/0!`, and the empty string for empty
//! cells. Layout (padding, headers, borders) is left to callers.

use gridcalc_core::{CellAddress, Grid};

/// A rectangular view onto a grid
///
/// Large grids are rendered through a window rather than whole; the
/// window is measured in cells, starting at `(start_row, start_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    pub start_row: u32,
    pub start_col: u32,
    pub rows: u32,
    pub cols: u32,
}

impl GridWindow {
    pub fn new(start_row: u32, start_col: u32, rows: u32, cols: u32) -> Self {
        Self {
            start_row,
            start_col,
            rows,
            cols,
        }
    }

    /// Fit this window inside `grid`
    ///
    /// The size shrinks to the grid's dimensions if it exceeds them, and
    /// the origin slides back so the window stays fully inside. A window
    /// scrolled past the edge therefore shows the last full page rather
    /// than a partial one.
    pub fn clamp(&self, grid: &Grid) -> GridWindow {
        let rows = self.rows.min(grid.rows());
        let cols = self.cols.min(grid.cols());
        GridWindow {
            start_row: self.start_row.min(grid.rows() - rows),
            start_col: self.start_col.min(grid.cols() - cols),
            rows,
            cols,
        }
    }
}

/// Render the window as rows of display strings
///
/// The window is clamped first, so the result always has `window.rows`
/// (or fewer, for an undersized grid) rows of equal width.
pub fn render_window(grid: &Grid, window: &GridWindow) -> Vec<Vec<String>> {
    let window = window.clamp(grid);
    let mut result = Vec::with_capacity(window.rows as usize);
    for row in window.start_row..window.start_row + window.rows {
        let mut line = Vec::with_capacity(window.cols as usize);
        for col in window.start_col..window.start_col + window.cols {
            line.push(
                grid.value_unchecked(&CellAddress::new(row, col))
                    .display_string(),
            );
        }
        result.push(line);
    }
    result
}

/// Render the entire grid; intended for small grids
pub fn render(grid: &Grid) -> Vec<Vec<String>> {
    render_window(grid, &GridWindow::new(0, 0, grid.rows(), grid.cols()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::{CellContent, CellError, CellValue};
    use pretty_assertions::assert_eq;

    fn grid_3x3() -> Grid {
        Grid::new(3, 3).unwrap()
    }

    #[test]
    fn test_fresh_grid_renders_empty_strings() {
        let rendered = render(&grid_3x3());
        assert_eq!(rendered, vec![vec!["", "", ""]; 3]);
    }

    #[test]
    fn test_render_values() {
        let mut grid = grid_3x3();
        let a1 = CellAddress::new(0, 0);
        grid.set_content(&a1, CellContent::Number(5.0)).unwrap();
        grid.set_value(&a1, CellValue::Number(5.0)).unwrap();
        let b2 = CellAddress::new(1, 1);
        grid.set_content(&b2, CellContent::Text("hi".to_string())).unwrap();
        grid.set_value(&b2, CellValue::text("hi")).unwrap();
        let c3 = CellAddress::new(2, 2);
        grid.set_value(&c3, CellValue::Error(CellError::DivByZero))
            .unwrap();

        let rendered = render(&grid);
        assert_eq!(rendered[0][0], "5");
        assert_eq!(rendered[1][1], "hi");
        assert_eq!(rendered[2][2], "#DIV/0!");
        assert_eq!(rendered[0][1], "");
    }

    #[test]
    fn test_window_selects_subrectangle() {
        let mut grid = Grid::new(10, 10).unwrap();
        let e5 = CellAddress::new(4, 4);
        grid.set_value(&e5, CellValue::Number(7.0)).unwrap();

        let rendered = render_window(&grid, &GridWindow::new(4, 4, 2, 2));
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].len(), 2);
        assert_eq!(rendered[0][0], "7");
    }

    #[test]
    fn test_window_clamps_to_grid_edge() {
        let grid = Grid::new(10, 10).unwrap();

        // Scrolled past the bottom-right corner: slides back to the
        // last full page
        let window = GridWindow::new(8, 9, 4, 4).clamp(&grid);
        assert_eq!(window, GridWindow::new(6, 6, 4, 4));

        // Bigger than the grid: shrinks and pins to the origin
        let window = GridWindow::new(0, 0, 20, 20).clamp(&grid);
        assert_eq!(window, GridWindow::new(0, 0, 10, 10));
    }
}
