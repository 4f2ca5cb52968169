//! Built-in function registry
//!
//! Functions are registered once in a global table and looked up by
//! uppercase name. Each entry carries its arity bounds so callers can
//! validate a parsed formula without evaluating it.

mod logical;
mod math;
mod statistical;
mod text;

use crate::ast::Expr;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::EvalValue;
use ahash::AHashMap;
use gridcalc_core::{CellError, CellValue};
use once_cell::sync::Lazy;

/// A registered built-in function
pub struct FunctionDef {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means variadic with no upper bound
    pub max_args: Option<usize>,
    implementation: fn(&[EvalValue]) -> CellValue,
}

impl FunctionDef {
    const fn new(
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: fn(&[EvalValue]) -> CellValue,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            implementation,
        }
    }

    fn accepts(&self, arg_count: usize) -> bool {
        arg_count >= self.min_args && self.max_args.map_or(true, |max| arg_count <= max)
    }

    fn expected_arity(&self) -> String {
        match (self.min_args, self.max_args) {
            (min, Some(max)) if min == max => format!("exactly {min}"),
            (min, Some(max)) => format!("between {min} and {max}"),
            (min, None) => format!("at least {min}"),
        }
    }
}

static REGISTRY: Lazy<AHashMap<&'static str, FunctionDef>> = Lazy::new(|| {
    let defs = [
        FunctionDef::new("SUM", 1, None, math::sum),
        FunctionDef::new("AVERAGE", 1, None, math::average),
        FunctionDef::new("COUNT", 1, None, math::count),
        FunctionDef::new("MIN", 1, None, math::min),
        FunctionDef::new("MAX", 1, None, math::max),
        FunctionDef::new("ABS", 1, Some(1), math::abs),
        FunctionDef::new("ROUND", 1, Some(2), math::round),
        FunctionDef::new("SQRT", 1, Some(1), math::sqrt),
        FunctionDef::new("STDEV", 1, None, statistical::stdev),
        FunctionDef::new("IF", 2, Some(3), logical::if_fn),
        FunctionDef::new("AND", 1, None, logical::and),
        FunctionDef::new("OR", 1, None, logical::or),
        FunctionDef::new("NOT", 1, Some(1), logical::not),
        FunctionDef::new("CONCATENATE", 1, None, text::concatenate),
        FunctionDef::new("LEN", 1, Some(1), text::len),
        FunctionDef::new("UPPER", 1, Some(1), text::upper),
        FunctionDef::new("LOWER", 1, Some(1), text::lower),
        FunctionDef::new("TRIM", 1, Some(1), text::trim),
    ];
    defs.into_iter().map(|def| (def.name, def)).collect()
});

/// Look up a function by name (case-insensitive)
pub fn lookup(name: &str) -> Option<&'static FunctionDef> {
    REGISTRY.get(name.to_ascii_uppercase().as_str())
}

/// Invoke a function on already-evaluated arguments
///
/// Unknown names and bad arities become `Error(Name)` values here; the
/// engine normally rejects both before a formula is ever committed, so
/// this path only fires for expressions evaluated outside that flow.
pub fn call(name: &str, args: &[EvalValue]) -> CellValue {
    match lookup(name) {
        Some(def) if def.accepts(args.len()) => (def.implementation)(args),
        _ => CellValue::Error(CellError::Name),
    }
}

/// Check every function call in `expr` against the registry
///
/// Fails with [`FormulaError::UnknownFunction`] or [`FormulaError::Arity`]
/// on the first offending call, without evaluating anything.
pub fn validate_expr(expr: &Expr) -> FormulaResult<()> {
    match expr {
        Expr::Number(_) | Expr::Text(_) | Expr::CellRef(_) | Expr::RangeRef(_) => Ok(()),
        Expr::UnaryOp { operand, .. } => validate_expr(operand),
        Expr::BinaryOp { left, right, .. } => {
            validate_expr(left)?;
            validate_expr(right)
        }
        Expr::Function { name, args } => {
            let def = lookup(name)
                .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
            if !def.accepts(args.len()) {
                return Err(FormulaError::Arity {
                    function: def.name.to_string(),
                    expected: def.expected_arity(),
                    actual: args.len(),
                });
            }
            for arg in args {
                validate_expr(arg)?;
            }
            Ok(())
        }
    }
}

/// Flatten arguments into their numeric contents
///
/// Direct scalar text is a type error; text and empties inside a range
/// are skipped, matching aggregate semantics. Any error value propagates.
pub(crate) fn collect_numbers(args: &[EvalValue]) -> Result<Vec<f64>, CellError> {
    let mut numbers = Vec::new();
    for arg in args {
        match arg {
            EvalValue::Scalar(value) => match value {
                CellValue::Number(n) => numbers.push(*n),
                CellValue::Empty => {}
                CellValue::Text(_) => return Err(CellError::Type),
                CellValue::Error(e) => return Err(*e),
            },
            EvalValue::Array(values) => {
                for value in values {
                    match value {
                        CellValue::Number(n) => numbers.push(*n),
                        CellValue::Empty | CellValue::Text(_) => {}
                        CellValue::Error(e) => return Err(*e),
                    }
                }
            }
        }
    }
    Ok(numbers)
}

/// A single scalar argument, rejecting ranges
pub(crate) fn scalar_arg(arg: &EvalValue) -> Result<&CellValue, CellError> {
    match arg {
        EvalValue::Scalar(CellValue::Error(e)) => Err(*e),
        EvalValue::Scalar(value) => Ok(value),
        EvalValue::Array(_) => Err(CellError::Type),
    }
}
