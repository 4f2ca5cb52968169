//! Formula expression tree

use gridcalc_core::{CellAddress, CellRange};

/// A parsed formula expression
///
/// Immutable once parsed; the recalculation engine caches one per formula
/// cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    Text(String),

    // === References ===
    /// Single cell reference
    CellRef(CellAddress),
    /// Range reference
    RangeRef(CellRange),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    // === Function call ===
    Function { name: String, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Text
    Concat,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

/// A reference unit extracted from an expression
///
/// Ranges stay as descriptors; they are never expanded to per-cell
/// references here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Cell(CellAddress),
    Range(CellRange),
}

impl Expr {
    /// Collect every cell and range reference in the expression
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut Vec<Reference>) {
        match self {
            Expr::CellRef(addr) => refs.push(Reference::Cell(*addr)),
            Expr::RangeRef(range) => refs.push(Reference::Range(*range)),
            Expr::BinaryOp { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
            Expr::UnaryOp { operand, .. } => operand.collect_references(refs),
            Expr::Function { args, .. } => {
                for arg in args {
                    arg.collect_references(refs);
                }
            }
            Expr::Number(_) | Expr::Text(_) => {}
        }
    }
}
