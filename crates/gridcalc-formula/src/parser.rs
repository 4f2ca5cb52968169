//! Formula parser
//!
//! A recursive descent parser with standard spreadsheet operator
//! precedence. Every rejection carries the byte offset of the offending
//! token so callers can point at the problem.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::{CellAddress, CellRange};

/// Parse a formula string into an expression tree
///
/// The text must start with the `=` formula marker.
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_formula;
///
/// let expr = parse_formula("=1+2").unwrap();
/// let expr = parse_formula("=SUM(A1:A10)").unwrap();
/// let expr = parse_formula("=IF(A1>0,\"Yes\",\"No\")").unwrap();
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Expr> {
    let trimmed = formula.trim_start();

    let body = trimmed
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::syntax(0, "formula must start with '='"))?;

    // Positions are reported against the original input
    let base = formula.len() - body.len();

    let mut parser = Parser::new(body, base)?;
    let expr = parser.parse_expression()?;

    if !matches!(parser.current, Token::Eof) {
        return Err(FormulaError::syntax(
            parser.current_pos,
            format!("unexpected trailing input: '{}'", &body[parser.current_pos - base..]),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    Text(String),

    // Identifiers and references
    Identifier(String), // Function name
    CellRef(String),    // Cell reference like A1, $A$1

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Ampersand,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Colon,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Text(_) => "string literal".into(),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::CellRef(r) => format!("cell reference '{}'", r),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::Ampersand => "'&'".into(),
            Token::Equal => "'='".into(),
            Token::NotEqual => "'<>'".into(),
            Token::LessThan => "'<'".into(),
            Token::LessEqual => "'<='".into(),
            Token::GreaterThan => "'>'".into(),
            Token::GreaterEqual => "'>='".into(),
            Token::Colon => "':'".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of formula".into(),
        }
    }
}

/// Maximum expression nesting depth
///
/// Bounds parser recursion (and, since every committed formula passed
/// through here, evaluator recursion) so pathological input gets a
/// syntax error instead of exhausting the call stack.
const MAX_EXPR_DEPTH: usize = 64;

struct Parser<'a> {
    input: &'a str,
    /// Byte offset of `input` within the original formula text
    base: usize,
    /// Scan position, in original-text coordinates
    pos: usize,
    current: Token,
    /// Start of `current`, in original-text coordinates
    current_pos: usize,
    /// Current expression nesting depth
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, base: usize) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            base,
            pos: base,
            current: Token::Eof,
            current_pos: base,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.current_pos = self.pos;
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '&' => Some(Token::Ampersand),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '=' => Some(Token::Equal),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Two-character comparison operators
        if c == '<' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Ok(Token::LessEqual);
            } else if self.peek_char() == Some('>') {
                self.advance();
                return Ok(Token::NotEqual);
            }
            return Ok(Token::LessThan);
        }

        if c == '>' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Ok(Token::GreaterEqual);
            }
            return Ok(Token::GreaterThan);
        }

        if c == '"' {
            return self.scan_string();
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            return Ok(self.scan_identifier_or_ref());
        }

        // Anything else is outside the grammar
        Err(FormulaError::syntax(
            self.pos,
            format!("unexpected character '{}'", c),
        ))
    }

    fn scan_string(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance(); // Skip opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    // "" inside a string is an escaped quote
                    if self.peek_char_at(1) == Some('"') {
                        s.push('"');
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Token::Text(s));
                    }
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => {
                    return Err(FormulaError::syntax(start, "unterminated string literal"));
                }
            }
        }
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            let digits_start = self.pos;
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            if self.pos == digits_start {
                return Err(FormulaError::syntax(start, "malformed number exponent"));
            }
        }

        let num_str = &self.input[start - self.base..self.pos - self.base];
        let num: f64 = num_str
            .parse()
            .map_err(|_| FormulaError::syntax(start, format!("malformed number '{}'", num_str)))?;
        Ok(Token::Number(num))
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[start - self.base..self.pos - self.base];

        // Letters-then-digits is a cell reference, unless a '(' follows
        // (LOG10(...) is a function call, not a reference)
        if is_cell_reference(text) && self.peek_char() != Some('(') {
            return Token::CellRef(text.to_string());
        }

        Token::Identifier(text.to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos - self.base..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos - self.base..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if &self.current == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::syntax(
                self.current_pos,
                format!(
                    "expected {}, got {}",
                    expected.describe(),
                    self.current.describe()
                ),
            ))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: =, <>, <, <=, >, >=
    // 2. Concatenation: &
    // 3. Addition/Subtraction: +, -
    // 4. Multiplication/Division: *, /
    // 5. Exponentiation: ^ (right associative)
    // 6. Unary: -, +
    // 7. Range: :
    // 8. Primary: literals, references, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Expr> {
        self.enter_nesting()?;
        let expr = self.parse_comparison();
        self.depth -= 1;
        expr
    }

    // Depth guard for every self-recursive parse path (parenthesized
    // expressions, function arguments, unary and exponent chains)
    fn enter_nesting(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            return Err(FormulaError::syntax(
                self.current_pos,
                format!("formula nesting exceeds {} levels", MAX_EXPR_DEPTH),
            ));
        }
        Ok(())
    }

    fn parse_comparison(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_concatenation()?;

        loop {
            let op = match self.current {
                Token::Equal => BinaryOperator::Equal,
                Token::NotEqual => BinaryOperator::NotEqual,
                Token::LessThan => BinaryOperator::LessThan,
                Token::LessEqual => BinaryOperator::LessEqual,
                Token::GreaterThan => BinaryOperator::GreaterThan,
                Token::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_concatenation()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_concatenation(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_additive()?;

        while matches!(self.current, Token::Ampersand) {
            self.consume()?;
            let right = self.parse_additive()?;
            left = Expr::BinaryOp {
                op: BinaryOperator::Concat,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.current {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> FormulaResult<Expr> {
        let left = self.parse_unary()?;

        if matches!(self.current, Token::Caret) {
            self.consume()?;
            self.enter_nesting()?;
            let right = self.parse_exponent()?; // Right associative
            self.depth -= 1;
            return Ok(Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        if matches!(self.current, Token::Minus) {
            self.consume()?;
            self.enter_nesting()?;
            let operand = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus is a no-op
        if matches!(self.current, Token::Plus) {
            self.consume()?;
            self.enter_nesting()?;
            let operand = self.parse_unary();
            self.depth -= 1;
            return operand;
        }

        self.parse_range()
    }

    fn parse_range(&mut self) -> FormulaResult<Expr> {
        let left_pos = self.current_pos;
        let left = self.parse_primary()?;

        if matches!(self.current, Token::Colon) {
            self.consume()?;
            let right_pos = self.current_pos;
            let right = self.parse_primary()?;

            // Only cell:cell forms a range
            return match (&left, &right) {
                (Expr::CellRef(start), Expr::CellRef(end)) => {
                    Ok(Expr::RangeRef(CellRange::new(*start, *end)))
                }
                (Expr::CellRef(_), _) => Err(FormulaError::syntax(
                    right_pos,
                    "expected cell reference after ':'",
                )),
                _ => Err(FormulaError::syntax(
                    left_pos,
                    "expected cell reference before ':'",
                )),
            };
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        match self.current.clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::Text(s) => {
                self.consume()?;
                Ok(Expr::Text(s))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::CellRef(ref_str) => {
                let pos = self.current_pos;
                self.consume()?;
                let addr = CellAddress::parse(&ref_str).map_err(|e| {
                    FormulaError::syntax(pos, format!("invalid cell reference: {}", e))
                })?;
                Ok(Expr::CellRef(addr))
            }

            Token::Identifier(name) => {
                let pos = self.current_pos;
                self.consume()?;
                if matches!(self.current, Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Err(FormulaError::syntax(
                        pos,
                        format!("'{}' is not a cell reference or function call", name),
                    ))
                }
            }

            other => Err(FormulaError::syntax(
                self.current_pos,
                format!("unexpected {}", other.describe()),
            )),
        }
    }

    fn parse_function_call(&mut self, name: String) -> FormulaResult<Expr> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        if !matches!(self.current, Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current, Token::Comma) {
                self.consume()?;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(Expr::Function {
            name: name.to_uppercase(),
            args,
        })
    }
}

/// Letters (with optional $ markers) followed by digits
fn is_cell_reference(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    if chars.get(i) == Some(&'$') {
        i += 1;
    }

    let letter_start = i;
    while i < chars.len() && chars[i].is_ascii_alphabetic() {
        i += 1;
    }
    if i == letter_start {
        return false;
    }

    if chars.get(i) == Some(&'$') {
        i += 1;
    }

    let digit_start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == digit_start {
        return false;
    }

    i == chars.len()
}
