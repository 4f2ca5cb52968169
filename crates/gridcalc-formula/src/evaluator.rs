//! Formula evaluation
//!
//! Evaluation never fails as a `Result`: every runtime problem becomes a
//! [`CellValue::Error`] that participates in further computation like any
//! other value, so errors flow downstream to every dependent cell.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::functions;
use gridcalc_core::{CellAddress, CellError, CellRange, CellValue};
use std::cmp::Ordering;

/// Source of cell values during evaluation
///
/// Implemented by whatever owns the grid; keeps the evaluator free of any
/// storage dependency.
pub trait CellResolver {
    /// Current computed value of the cell at `addr`
    fn cell_value(&self, addr: &CellAddress) -> CellValue;

    /// Values of the populated cells inside `range`, in row order
    ///
    /// Empty cells are never reported; every aggregate already skips
    /// them, so a range over millions of addresses must cost its
    /// populated cells, not its area. Sparse backings override this —
    /// the default walks the whole rectangle and fits small resolvers
    /// only.
    fn range_values(&self, range: &CellRange) -> Vec<CellValue> {
        range
            .cells()
            .map(|addr| self.cell_value(&addr))
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// An evaluated operand: a scalar, or the populated cells of a range
///
/// Ranges are only meaningful as aggregate-function arguments; a range
/// that reaches a scalar position evaluates to `Error(Type)`. Empty
/// cells inside a range carry no information for any aggregate and are
/// not materialized.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalValue {
    Scalar(CellValue),
    Array(Vec<CellValue>),
}

/// Evaluate `expr` to a single cell value
pub fn evaluate(expr: &Expr, cells: &dyn CellResolver) -> CellValue {
    match evaluate_operand(expr, cells) {
        EvalValue::Scalar(value) => value,
        EvalValue::Array(_) => CellValue::Error(CellError::Type),
    }
}

fn evaluate_operand(expr: &Expr, cells: &dyn CellResolver) -> EvalValue {
    match expr {
        Expr::Number(n) => EvalValue::Scalar(CellValue::Number(*n)),
        Expr::Text(s) => EvalValue::Scalar(CellValue::Text(s.clone())),
        Expr::CellRef(addr) => EvalValue::Scalar(cells.cell_value(addr)),
        Expr::RangeRef(range) => EvalValue::Array(cells.range_values(range)),
        Expr::UnaryOp { op, operand } => {
            EvalValue::Scalar(evaluate_unary(*op, operand, cells))
        }
        Expr::BinaryOp { op, left, right } => {
            EvalValue::Scalar(evaluate_binary(*op, left, right, cells))
        }
        Expr::Function { name, args } => {
            let arg_values: Vec<EvalValue> =
                args.iter().map(|arg| evaluate_operand(arg, cells)).collect();
            EvalValue::Scalar(functions::call(name, &arg_values))
        }
    }
}

fn evaluate_unary(op: UnaryOperator, operand: &Expr, cells: &dyn CellResolver) -> CellValue {
    let value = evaluate(operand, cells);
    match op {
        UnaryOperator::Negate => match coerce_number(&value) {
            Ok(n) => CellValue::Number(-n),
            Err(e) => CellValue::Error(e),
        },
    }
}

fn evaluate_binary(
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    cells: &dyn CellResolver,
) -> CellValue {
    let lhs = evaluate(left, cells);
    let rhs = evaluate(right, cells);

    // Left operand's error wins when both carry one
    if let CellValue::Error(e) = lhs {
        return CellValue::Error(e);
    }
    if let CellValue::Error(e) = rhs {
        return CellValue::Error(e);
    }

    match op {
        BinaryOperator::Add
        | BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Power => evaluate_arithmetic(op, &lhs, &rhs),
        BinaryOperator::Concat => {
            CellValue::Text(format!("{}{}", lhs.display_string(), rhs.display_string()))
        }
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::LessThan
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterEqual => {
            let ordering = compare_values(&lhs, &rhs);
            let holds = match op {
                BinaryOperator::Equal => ordering == Ordering::Equal,
                BinaryOperator::NotEqual => ordering != Ordering::Equal,
                BinaryOperator::LessThan => ordering == Ordering::Less,
                BinaryOperator::LessEqual => ordering != Ordering::Greater,
                BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                BinaryOperator::GreaterEqual => ordering != Ordering::Less,
                _ => unreachable!(),
            };
            CellValue::Number(if holds { 1.0 } else { 0.0 })
        }
    }
}

fn evaluate_arithmetic(op: BinaryOperator, lhs: &CellValue, rhs: &CellValue) -> CellValue {
    let l = match coerce_number(lhs) {
        Ok(n) => n,
        Err(e) => return CellValue::Error(e),
    };
    let r = match coerce_number(rhs) {
        Ok(n) => n,
        Err(e) => return CellValue::Error(e),
    };

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return CellValue::Error(CellError::DivByZero);
            }
            l / r
        }
        BinaryOperator::Power => l.powf(r),
        _ => unreachable!("non-arithmetic operator"),
    };

    CellValue::Number(result)
}

/// Numeric coercion for arithmetic contexts
///
/// `Empty` counts as zero, text never converts.
pub(crate) fn coerce_number(value: &CellValue) -> Result<f64, CellError> {
    match value {
        CellValue::Empty => Ok(0.0),
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(_) => Err(CellError::Type),
        CellValue::Error(e) => Err(*e),
    }
}

/// Total order over non-error values: Empty < Number < Text
///
/// NaN compares equal to itself here so the order stays total.
pub(crate) fn compare_values(lhs: &CellValue, rhs: &CellValue) -> Ordering {
    fn rank(value: &CellValue) -> u8 {
        match value {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Error(_) => 3, // callers filter errors out first
        }
    }

    match (lhs, rhs) {
        (CellValue::Number(a), CellValue::Number(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}
