//! Statistical functions

use super::collect_numbers;
use crate::evaluator::EvalValue;
use gridcalc_core::{CellError, CellValue};

/// Sample standard deviation (n - 1 divisor); needs at least two values
pub(super) fn stdev(args: &[EvalValue]) -> CellValue {
    let numbers = match collect_numbers(args) {
        Ok(numbers) => numbers,
        Err(e) => return CellValue::Error(e),
    };
    if numbers.len() < 2 {
        return CellValue::Error(CellError::DivByZero);
    }

    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let variance = numbers.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0);
    CellValue::Number(variance.sqrt())
}
