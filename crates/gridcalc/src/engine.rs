//! The recalculation engine
//!
//! [`Engine`] ties the grid, the dependency graph, and the parsed-formula
//! cache together behind a single submission entry point. Every mutating
//! method takes `&mut self`, so a shared engine cannot be edited from two
//! places at once.

use crate::render::{self, GridWindow};
use ahash::AHashMap;
use gridcalc_core::{CellAddress, CellContent, CellRange, CellValue, Grid};
use gridcalc_formula::ast::Expr;
use gridcalc_formula::evaluator::{evaluate, CellResolver};
use gridcalc_formula::{functions, parse_formula, DependencyGraph, FormulaError, Reference};
use thiserror::Error;

/// Errors that reject a submission outright
///
/// When `submit` returns one of these, neither the grid nor the
/// dependency graph has changed. Runtime evaluation problems are not
/// errors at this level; they land in cells as `#DIV/0!`-style values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] gridcalc_core::Error),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// A spreadsheet engine over a fixed-dimension grid
///
/// ```
/// use gridcalc::Engine;
/// use gridcalc_core::CellValue;
///
/// let mut engine = Engine::new(3, 3).unwrap();
/// engine.submit("A1".parse().unwrap(), "5").unwrap();
/// engine.submit("B1".parse().unwrap(), "=A1*2").unwrap();
/// let b1 = engine.value(&"B1".parse().unwrap()).unwrap();
/// assert_eq!(b1, CellValue::Number(10.0));
/// ```
#[derive(Debug)]
pub struct Engine {
    grid: Grid,
    graph: DependencyGraph,
    /// Parsed ASTs for every formula cell; the grid stores only source text
    parsed: AHashMap<CellAddress, Expr>,
}

impl Engine {
    /// Create an engine over an empty `rows` x `cols` grid
    pub fn new(rows: u32, cols: u32) -> EngineResult<Self> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            graph: DependencyGraph::new(),
            parsed: AHashMap::new(),
        })
    }

    /// The underlying grid, read-only
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Computed value of the cell at `addr`
    pub fn value(&self, addr: &CellAddress) -> EngineResult<CellValue> {
        Ok(self.grid.value(addr)?)
    }

    /// Stored content of the cell at `addr` (formula source, not value)
    pub fn content(&self, addr: &CellAddress) -> EngineResult<CellContent> {
        Ok(self.grid.content(addr)?)
    }

    /// Submit raw input to a cell
    ///
    /// Input is classified as in a spreadsheet edit box: blank clears the
    /// cell, a leading `=` makes a formula, a parseable number is numeric,
    /// anything else is text. Formulas are fully validated (syntax,
    /// function names and arity, reference bounds, cycles) before anything
    /// is committed; a rejection leaves the engine exactly as it was.
    /// On success the cell and everything downstream of it is recalculated.
    pub fn submit(&mut self, addr: CellAddress, input: &str) -> EngineResult<()> {
        self.grid.check_bounds(&addr)?;

        let content = classify(input);
        match &content {
            CellContent::Formula(source) => {
                let expr = parse_formula(source)?;
                functions::validate_expr(&expr)?;

                let refs = expr.references();
                for reference in &refs {
                    match reference {
                        Reference::Cell(cell) => self.grid.check_bounds(cell)?,
                        Reference::Range(range) => {
                            self.grid.check_bounds(&range.start)?;
                            self.grid.check_bounds(&range.end)?;
                        }
                    }
                }

                // Last rejection point; after this the edit is committed
                self.graph.set_dependencies(addr, refs)?;

                self.grid.set_content(&addr, content.clone())?;
                self.parsed.insert(addr, expr);
            }
            _ => {
                self.graph.remove_dependencies(addr);
                self.parsed.remove(&addr);
                self.grid.set_content(&addr, content)?;
            }
        }

        self.recalculate(addr);
        Ok(())
    }

    /// Submit and return the freshly rendered window in one call
    pub fn submit_and_render(
        &mut self,
        addr: CellAddress,
        input: &str,
        window: &GridWindow,
    ) -> EngineResult<Vec<Vec<String>>> {
        self.submit(addr, input)?;
        Ok(render::render_window(&self.grid, window))
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.grid.cell_count()
    }

    // Re-evaluate `start` and every transitive dependent, in dependency
    // order. Each value is written back before the next cell evaluates,
    // so downstream formulas always read fresh upstream values.
    fn recalculate(&mut self, start: CellAddress) {
        for cell in self.graph.recalc_order(&[start]) {
            let value = match self.parsed.get(&cell) {
                Some(expr) => evaluate(expr, &GridResolver(&self.grid)),
                None => literal_value(&self.grid, &cell),
            };
            // Cells in the graph were bounds-checked on entry
            let _ = self.grid.set_value(&cell, value);
        }
    }
}

// Adapter so the evaluator can read cell values without the formula
// crate depending on grid storage
struct GridResolver<'a>(&'a Grid);

impl CellResolver for GridResolver<'_> {
    fn cell_value(&self, addr: &CellAddress) -> CellValue {
        self.0.value_unchecked(addr)
    }

    // Sparse: an aggregate over a whole-grid range costs the populated
    // cells, never the covered area
    fn range_values(&self, range: &CellRange) -> Vec<CellValue> {
        self.0.values_in_range(range).cloned().collect()
    }
}

fn classify(input: &str) -> CellContent {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CellContent::Empty;
    }
    if trimmed.starts_with('=') {
        return CellContent::Formula(trimmed.to_string());
    }
    // f64 parsing accepts "inf", "infinity" and "nan"; only finite
    // literals are numbers, the rest stay text
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellContent::Number(n),
        _ => CellContent::Text(trimmed.to_string()),
    }
}

fn literal_value(grid: &Grid, addr: &CellAddress) -> CellValue {
    match grid.content(addr) {
        Ok(CellContent::Number(n)) => CellValue::Number(n),
        Ok(CellContent::Text(s)) => CellValue::Text(s),
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), CellContent::Empty);
        assert_eq!(classify("   "), CellContent::Empty);
        assert_eq!(classify("42"), CellContent::Number(42.0));
        assert_eq!(classify("-2.5"), CellContent::Number(-2.5));
        assert_eq!(classify("1e3"), CellContent::Number(1000.0));
        assert_eq!(classify("hello"), CellContent::Text("hello".to_string()));
        assert_eq!(classify("12 apples"), CellContent::Text("12 apples".to_string()));
        assert_eq!(
            classify(" =A1+1 "),
            CellContent::Formula("=A1+1".to_string())
        );
    }

    #[test]
    fn test_classify_rejects_non_finite_literals() {
        assert_eq!(classify("nan"), CellContent::Text("nan".to_string()));
        assert_eq!(classify("NaN"), CellContent::Text("NaN".to_string()));
        assert_eq!(classify("inf"), CellContent::Text("inf".to_string()));
        assert_eq!(classify("-inf"), CellContent::Text("-inf".to_string()));
        assert_eq!(
            classify("infinity"),
            CellContent::Text("infinity".to_string())
        );
        assert_eq!(classify("1e999"), CellContent::Text("1e999".to_string()));
    }

    #[test]
    fn test_non_finite_input_stays_text() {
        let mut engine = Engine::new(3, 3).unwrap();
        engine.submit(addr("A1"), "nan").unwrap();
        assert_eq!(
            engine.value(&addr("A1")).unwrap(),
            CellValue::Text("nan".to_string())
        );
        engine.submit(addr("A2"), "inf").unwrap();
        engine.submit(addr("A3"), "=SUM(A1:A2)").unwrap();
        assert_eq!(engine.value(&addr("A3")).unwrap(), CellValue::Number(0.0));
    }

    #[test]
    fn test_literal_submission() {
        let mut engine = Engine::new(3, 3).unwrap();
        engine.submit(addr("A1"), "5").unwrap();
        assert_eq!(engine.value(&addr("A1")).unwrap(), CellValue::Number(5.0));
        assert_eq!(engine.content(&addr("A1")).unwrap(), CellContent::Number(5.0));
    }

    #[test]
    fn test_blank_clears_cell() {
        let mut engine = Engine::new(3, 3).unwrap();
        engine.submit(addr("A1"), "5").unwrap();
        engine.submit(addr("A1"), "").unwrap();
        assert_eq!(engine.value(&addr("A1")).unwrap(), CellValue::Empty);
        assert_eq!(engine.cell_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_target_rejected() {
        let mut engine = Engine::new(3, 3).unwrap();
        let err = engine.submit(addr("D4"), "1").unwrap_err();
        assert!(matches!(err, EngineError::Grid(_)));
    }

    #[test]
    fn test_out_of_bounds_reference_rejected() {
        let mut engine = Engine::new(3, 3).unwrap();
        assert!(engine.submit(addr("A1"), "=Z99").is_err());
        assert!(engine.submit(addr("A1"), "=SUM(A1:Z99)").is_err());
        // Nothing committed
        assert_eq!(engine.cell_count(), 0);
    }

    #[test]
    fn test_formula_over_formula_replaces_dependencies() {
        let mut engine = Engine::new(3, 3).unwrap();
        engine.submit(addr("A1"), "1").unwrap();
        engine.submit(addr("B1"), "2").unwrap();
        engine.submit(addr("C1"), "=A1").unwrap();
        engine.submit(addr("C1"), "=B1").unwrap();

        engine.submit(addr("A1"), "100").unwrap();
        assert_eq!(engine.value(&addr("C1")).unwrap(), CellValue::Number(2.0));
    }
}
