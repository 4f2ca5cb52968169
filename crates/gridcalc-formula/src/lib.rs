//! # gridcalc-formula
//!
//! Formula parsing and evaluation for gridcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value, errors as values)
//! - Built-in functions (math, statistical, logical, text)
//! - Dependency tracking with cycle rejection
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridcalc_formula::{parse_formula, evaluate};
//!
//! let ast = parse_formula("=SUM(A1:A10)")?;
//! let value = evaluate(&ast, &cells);
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, Expr, Reference, UnaryOperator};
pub use dependency::DependencyGraph;
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellResolver, EvalValue};
pub use parser::parse_formula;
