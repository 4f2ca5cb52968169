//! Logical functions
//!
//! The value model has no boolean: conditions are numbers (non-zero is
//! true, `Empty` is false) and results are `Number(1.0)` / `Number(0.0)`.

use super::scalar_arg;
use crate::evaluator::EvalValue;
use gridcalc_core::{CellError, CellValue};

fn truthiness(value: &CellValue) -> Result<bool, CellError> {
    match value {
        CellValue::Number(n) => Ok(*n != 0.0),
        CellValue::Empty => Ok(false),
        CellValue::Text(_) => Err(CellError::Type),
        CellValue::Error(e) => Err(*e),
    }
}

/// IF(condition, then, [else]); the missing else branch yields Empty
///
/// Arguments arrive pre-evaluated, so an error in the branch not taken
/// does not leak into the result.
pub(super) fn if_fn(args: &[EvalValue]) -> CellValue {
    let condition = match scalar_arg(&args[0]).and_then(|v| truthiness(v)) {
        Ok(b) => b,
        Err(e) => return CellValue::Error(e),
    };

    let branch = if condition { args.get(1) } else { args.get(2) };
    match branch {
        Some(EvalValue::Scalar(value)) => value.clone(),
        Some(EvalValue::Array(_)) => CellValue::Error(CellError::Type),
        None => CellValue::Empty,
    }
}

pub(super) fn and(args: &[EvalValue]) -> CellValue {
    fold_logical(args, true, |acc, b| acc && b)
}

pub(super) fn or(args: &[EvalValue]) -> CellValue {
    fold_logical(args, false, |acc, b| acc || b)
}

// Empty cells inside a range are skipped; a direct Empty argument is false
fn fold_logical(args: &[EvalValue], init: bool, combine: fn(bool, bool) -> bool) -> CellValue {
    let mut acc = init;
    for arg in args {
        match arg {
            EvalValue::Scalar(value) => match truthiness(value) {
                Ok(b) => acc = combine(acc, b),
                Err(e) => return CellValue::Error(e),
            },
            EvalValue::Array(values) => {
                for value in values {
                    match value {
                        CellValue::Empty | CellValue::Text(_) => {}
                        _ => match truthiness(value) {
                            Ok(b) => acc = combine(acc, b),
                            Err(e) => return CellValue::Error(e),
                        },
                    }
                }
            }
        }
    }
    CellValue::Number(if acc { 1.0 } else { 0.0 })
}

pub(super) fn not(args: &[EvalValue]) -> CellValue {
    match scalar_arg(&args[0]).and_then(|v| truthiness(v)) {
        Ok(b) => CellValue::Number(if b { 0.0 } else { 1.0 }),
        Err(e) => CellValue::Error(e),
    }
}
