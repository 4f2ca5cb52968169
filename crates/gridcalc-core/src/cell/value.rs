//! Cell content and value types

use std::fmt;

/// Evaluation error kinds stored in cells and rendered as short tags
///
/// These are ordinary values, not faults: they flow through dependent
/// formulas the way NaN flows through floating-point arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #DIV/0! - Division by zero
    DivByZero,
    /// #VALUE! - Operand or argument of the wrong type
    Type,
    /// #NAME? - Unrecognized function name
    Name,
    /// #CYCLE! - Cell participates in a circular dependency
    Cycle,
    /// #SYNTAX! - Cell holds an unparseable formula
    Syntax,
}

impl CellError {
    /// Get the display tag for this error
    pub fn as_tag(&self) -> &'static str {
        match self {
            CellError::DivByZero => "#DIV/0!",
            CellError::Type => "#VALUE!",
            CellError::Name => "#NAME?",
            CellError::Cycle => "#CYCLE!",
            CellError::Syntax => "#SYNTAX!",
        }
    }

    /// Parse an error tag
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#DIV/0!" => Some(CellError::DivByZero),
            "#VALUE!" => Some(CellError::Type),
            "#NAME?" => Some(CellError::Name),
            "#CYCLE!" => Some(CellError::Cycle),
            "#SYNTAX!" => Some(CellError::Syntax),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// The raw user-entered data at a cell
///
/// A cell holds exactly one variant at a time; writing new content
/// replaces the old variant wholesale. Formula cells keep their source
/// text here; the parsed expression is cached by the recalculation
/// engine, keyed by address.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Nothing entered (or content cleared)
    Empty,
    /// Numeric literal
    Number(f64),
    /// Text literal
    Text(String),
    /// Formula source text, including the leading '='
    Formula(String),
}

impl CellContent {
    /// Check if the cell has no content
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// Get the formula source if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellContent::Formula(text) => Some(text),
            _ => None,
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Empty
    }
}

/// The computed result of a cell
///
/// Derived from [`CellContent`] by evaluation; literal cells carry their
/// literal value, formula cells the cached evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (no value)
    Empty,
    /// Numeric value (all numbers stored as f64)
    Number(f64),
    /// Text value
    Text(String),
    /// Error value (#DIV/0!, #VALUE!, ...)
    Error(CellError),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error if this is one
    pub fn error(&self) -> Option<CellError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Error(_) => "error",
        }
    }

    /// Render to the canonical display form
    ///
    /// Numbers print without a trailing fractional part when integral,
    /// text prints as-is, errors print their tag, empty prints as "".
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Error(e) => e.as_tag().to_string(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Canonical decimal form: integers without trailing ".0"
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
