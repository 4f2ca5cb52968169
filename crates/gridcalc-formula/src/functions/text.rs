//! Text functions

use super::scalar_arg;
use crate::evaluator::EvalValue;
use gridcalc_core::{CellError, CellValue};

// Non-error scalars coerce to their display form; Empty is ""
fn text_arg(arg: &EvalValue) -> Result<String, CellError> {
    Ok(scalar_arg(arg)?.display_string())
}

pub(super) fn concatenate(args: &[EvalValue]) -> CellValue {
    let mut result = String::new();
    for arg in args {
        match text_arg(arg) {
            Ok(s) => result.push_str(&s),
            Err(e) => return CellValue::Error(e),
        }
    }
    CellValue::Text(result)
}

/// Character count, not byte count
pub(super) fn len(args: &[EvalValue]) -> CellValue {
    match text_arg(&args[0]) {
        Ok(s) => CellValue::Number(s.chars().count() as f64),
        Err(e) => CellValue::Error(e),
    }
}

pub(super) fn upper(args: &[EvalValue]) -> CellValue {
    map_text(&args[0], |s| s.to_uppercase())
}

pub(super) fn lower(args: &[EvalValue]) -> CellValue {
    map_text(&args[0], |s| s.to_lowercase())
}

/// Strips leading and trailing whitespace and collapses interior runs
/// of spaces to a single space
pub(super) fn trim(args: &[EvalValue]) -> CellValue {
    map_text(&args[0], |s| {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    })
}

fn map_text(arg: &EvalValue, f: impl Fn(&str) -> String) -> CellValue {
    match text_arg(arg) {
        Ok(s) => CellValue::Text(f(&s)),
        Err(e) => CellValue::Error(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{evaluate, CellResolver};
    use crate::parser::parse_formula;
    use gridcalc_core::{CellAddress, CellError, CellValue};
    use pretty_assertions::assert_eq;

    struct OneCell(CellValue);

    impl CellResolver for OneCell {
        fn cell_value(&self, addr: &CellAddress) -> CellValue {
            if addr.row == 0 && addr.col == 0 {
                self.0.clone()
            } else {
                CellValue::Empty
            }
        }
    }

    fn eval(formula: &str) -> CellValue {
        evaluate(&parse_formula(formula).unwrap(), &OneCell(CellValue::Empty))
    }

    #[test]
    fn test_concatenate() {
        assert_eq!(
            eval("=CONCATENATE(\"a\",\"b\",\"c\")"),
            CellValue::Text("abc".into())
        );
        // Numbers render through the shared display formatting
        assert_eq!(eval("=CONCATENATE(\"n=\",42)"), CellValue::Text("n=42".into()));
        assert_eq!(eval("=CONCATENATE(\"x\",A1)"), CellValue::Text("x".into()));
    }

    #[test]
    fn test_concatenate_propagates_errors() {
        let cells = OneCell(CellValue::Error(CellError::DivByZero));
        let expr = parse_formula("=CONCATENATE(\"x\",A1)").unwrap();
        assert_eq!(
            evaluate(&expr, &cells),
            CellValue::Error(CellError::DivByZero)
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(eval("=LEN(\"hello\")"), CellValue::Number(5.0));
        assert_eq!(eval("=LEN(\"\")"), CellValue::Number(0.0));
        assert_eq!(eval("=LEN(A1)"), CellValue::Number(0.0));
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(eval("=UPPER(\"MiXeD\")"), CellValue::Text("MIXED".into()));
        assert_eq!(eval("=LOWER(\"MiXeD\")"), CellValue::Text("mixed".into()));
    }

    #[test]
    fn test_trim() {
        assert_eq!(
            eval("=TRIM(\"  a   b  \")"),
            CellValue::Text("a b".into())
        );
    }
}
