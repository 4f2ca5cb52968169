//! Math and aggregate functions

use super::{collect_numbers, scalar_arg};
use crate::evaluator::{coerce_number, EvalValue};
use gridcalc_core::{CellError, CellValue};

pub(super) fn sum(args: &[EvalValue]) -> CellValue {
    match collect_numbers(args) {
        Ok(numbers) => CellValue::Number(numbers.iter().sum()),
        Err(e) => CellValue::Error(e),
    }
}

pub(super) fn average(args: &[EvalValue]) -> CellValue {
    match collect_numbers(args) {
        Ok(numbers) if numbers.is_empty() => CellValue::Error(CellError::DivByZero),
        Ok(numbers) => CellValue::Number(numbers.iter().sum::<f64>() / numbers.len() as f64),
        Err(e) => CellValue::Error(e),
    }
}

/// COUNT counts numeric values only; text and empties do not count
pub(super) fn count(args: &[EvalValue]) -> CellValue {
    let mut n = 0u64;
    for arg in args {
        match arg {
            EvalValue::Scalar(CellValue::Error(e)) => return CellValue::Error(*e),
            EvalValue::Scalar(CellValue::Number(_)) => n += 1,
            EvalValue::Scalar(_) => {}
            EvalValue::Array(values) => {
                for value in values {
                    match value {
                        CellValue::Error(e) => return CellValue::Error(*e),
                        CellValue::Number(_) => n += 1,
                        _ => {}
                    }
                }
            }
        }
    }
    CellValue::Number(n as f64)
}

pub(super) fn min(args: &[EvalValue]) -> CellValue {
    fold_extremum(args, |best, n| n < best)
}

pub(super) fn max(args: &[EvalValue]) -> CellValue {
    fold_extremum(args, |best, n| n > best)
}

// MIN/MAX over no numeric values is 0
fn fold_extremum(args: &[EvalValue], better: fn(f64, f64) -> bool) -> CellValue {
    match collect_numbers(args) {
        Ok(numbers) => {
            let mut result = 0.0;
            let mut seen = false;
            for n in numbers {
                if !seen || better(result, n) {
                    result = n;
                    seen = true;
                }
            }
            CellValue::Number(result)
        }
        Err(e) => CellValue::Error(e),
    }
}

pub(super) fn abs(args: &[EvalValue]) -> CellValue {
    unary_numeric(args, f64::abs)
}

pub(super) fn sqrt(args: &[EvalValue]) -> CellValue {
    match numeric_arg(&args[0]) {
        Ok(n) if n < 0.0 => CellValue::Error(CellError::Type),
        Ok(n) => CellValue::Number(n.sqrt()),
        Err(e) => CellValue::Error(e),
    }
}

/// ROUND(n) or ROUND(n, digits); half rounds away from zero
pub(super) fn round(args: &[EvalValue]) -> CellValue {
    let n = match numeric_arg(&args[0]) {
        Ok(n) => n,
        Err(e) => return CellValue::Error(e),
    };
    let digits = match args.get(1) {
        Some(arg) => match numeric_arg(arg) {
            Ok(d) => d.trunc() as i32,
            Err(e) => return CellValue::Error(e),
        },
        None => 0,
    };
    // Keep the scale factor a positive power of ten so negative-digit
    // rounding multiplies back instead of dividing by an inexact 10^-d
    let rounded = if digits >= 0 {
        let factor = 10f64.powi(digits);
        (n * factor).round() / factor
    } else {
        let factor = 10f64.powi(-digits);
        (n / factor).round() * factor
    };
    CellValue::Number(rounded)
}

fn unary_numeric(args: &[EvalValue], f: fn(f64) -> f64) -> CellValue {
    match numeric_arg(&args[0]) {
        Ok(n) => CellValue::Number(f(n)),
        Err(e) => CellValue::Error(e),
    }
}

fn numeric_arg(arg: &EvalValue) -> Result<f64, CellError> {
    coerce_number(scalar_arg(arg)?)
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{evaluate, CellResolver};
    use crate::parser::parse_formula;
    use gridcalc_core::{CellAddress, CellError, CellValue};
    use pretty_assertions::assert_eq;

    struct Column(Vec<CellValue>);

    impl CellResolver for Column {
        fn cell_value(&self, addr: &CellAddress) -> CellValue {
            if addr.col == 0 {
                self.0.get(addr.row as usize).cloned().unwrap_or(CellValue::Empty)
            } else {
                CellValue::Empty
            }
        }
    }

    fn eval(formula: &str, column: &[CellValue]) -> CellValue {
        let cells = Column(column.to_vec());
        evaluate(&parse_formula(formula).unwrap(), &cells)
    }

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&n| CellValue::Number(n)).collect()
    }

    #[test]
    fn test_sum() {
        assert_eq!(eval("=SUM(A1:A3)", &nums(&[1.0, 2.0, 3.0])), CellValue::Number(6.0));
        assert_eq!(eval("=SUM(1,2,3)", &[]), CellValue::Number(6.0));
        // Empty cells contribute nothing
        assert_eq!(eval("=SUM(A1:A10)", &nums(&[5.0])), CellValue::Number(5.0));
        assert_eq!(eval("=SUM(A1:A3)", &[]), CellValue::Number(0.0));
    }

    #[test]
    fn test_sum_skips_text_in_range_but_not_direct() {
        let mixed = vec![
            CellValue::Number(1.0),
            CellValue::Text("x".into()),
            CellValue::Number(2.0),
        ];
        assert_eq!(eval("=SUM(A1:A3)", &mixed), CellValue::Number(3.0));
        assert_eq!(eval("=SUM(\"x\")", &[]), CellValue::Error(CellError::Type));
    }

    #[test]
    fn test_sum_propagates_errors() {
        let column = vec![CellValue::Number(1.0), CellValue::Error(CellError::DivByZero)];
        assert_eq!(
            eval("=SUM(A1:A2)", &column),
            CellValue::Error(CellError::DivByZero)
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(eval("=AVERAGE(A1:A4)", &nums(&[1.0, 2.0, 3.0, 4.0])), CellValue::Number(2.5));
        // Empties are excluded from the divisor
        assert_eq!(eval("=AVERAGE(A1:A10)", &nums(&[4.0, 6.0])), CellValue::Number(5.0));
        assert_eq!(
            eval("=AVERAGE(A1:A3)", &[]),
            CellValue::Error(CellError::DivByZero)
        );
    }

    #[test]
    fn test_count() {
        let mixed = vec![
            CellValue::Number(1.0),
            CellValue::Text("x".into()),
            CellValue::Empty,
            CellValue::Number(2.0),
        ];
        assert_eq!(eval("=COUNT(A1:A10)", &mixed), CellValue::Number(2.0));
    }

    #[test]
    fn test_min_max() {
        let column = nums(&[3.0, -1.0, 7.0]);
        assert_eq!(eval("=MIN(A1:A3)", &column), CellValue::Number(-1.0));
        assert_eq!(eval("=MAX(A1:A3)", &column), CellValue::Number(7.0));
        assert_eq!(eval("=MIN(A1:A3)", &[]), CellValue::Number(0.0));
    }

    #[test]
    fn test_abs_sqrt() {
        assert_eq!(eval("=ABS(-3)", &[]), CellValue::Number(3.0));
        assert_eq!(eval("=SQRT(9)", &[]), CellValue::Number(3.0));
        assert_eq!(eval("=SQRT(0-1)", &[]), CellValue::Error(CellError::Type));
    }

    #[test]
    fn test_round() {
        assert_eq!(eval("=ROUND(2.5)", &[]), CellValue::Number(3.0));
        assert_eq!(eval("=ROUND(2.4)", &[]), CellValue::Number(2.0));
        assert_eq!(eval("=ROUND(3.14159,2)", &[]), CellValue::Number(3.14));
        assert_eq!(eval("=ROUND(1234.5,0-2)", &[]), CellValue::Number(1200.0));
    }
}
