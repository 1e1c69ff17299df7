//! Arithmetic expression evaluator for the math agent's deterministic path.
//!
//! Supports + - * / ^ with parentheses and unary minus over f64. Queries
//! like "what is 12 * (3 + 4)?" are answered without an LLM call:
//! [`extract_arithmetic`] pulls the numeric skeleton out of the prose and
//! [`evaluate`] runs a small recursive-descent parser over it.

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Result of evaluating an arithmetic expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticResult {
    pub expression: String,
    pub result: f64,
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<ArithmeticResult, ValidationError> {
    let mut parser = Parser::new(expression);
    let value = parser.parse_expr()?;
    parser.expect_end()?;

    if !value.is_finite() {
        return Err(ValidationError::UnparsableExpression(
            "result is not finite (division by zero?)".to_string(),
        ));
    }

    Ok(ArithmeticResult {
        expression: expression.trim().to_string(),
        result: value,
    })
}

/// Pull a candidate arithmetic expression out of free text.
///
/// Keeps digits, operators, parentheses, and decimal points; requires at
/// least one digit and one operator to avoid treating "warehouse 3" as
/// arithmetic. Returns None when the text has no such skeleton.
pub fn extract_arithmetic(text: &str) -> Option<String> {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || "+-*/^(). ".contains(*c))
        .collect();
    let candidate = filtered.trim().to_string();

    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
    let has_operator = candidate.chars().any(|c| "+*/^".contains(c))
        || candidate
            .chars()
            .zip(candidate.chars().skip(1))
            .any(|(a, b)| a.is_ascii_digit() && b == '-' || a == '-' && b.is_ascii_digit());

    if has_digit && has_operator {
        Some(candidate)
    } else {
        None
    }
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            source,
        }
    }

    fn error(&self, detail: &str) -> ValidationError {
        ValidationError::UnparsableExpression(format!("{} in '{}'", detail, self.source.trim()))
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.peek().copied()
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, ValidationError> {
        let mut value = self.parse_term()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.chars.next();
                    value += self.parse_term()?;
                }
                Some('-') => {
                    self.chars.next();
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := power (('*' | '/') power)*
    fn parse_term(&mut self) -> Result<f64, ValidationError> {
        let mut value = self.parse_power()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.chars.next();
                    value *= self.parse_power()?;
                }
                Some('/') => {
                    self.chars.next();
                    value /= self.parse_power()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // power := unary ('^' power)?   (right-associative)
    fn parse_power(&mut self) -> Result<f64, ValidationError> {
        let base = self.parse_unary()?;
        if self.peek() == Some('^') {
            self.chars.next();
            let exponent = self.parse_power()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    // unary := '-' unary | primary
    fn parse_unary(&mut self) -> Result<f64, ValidationError> {
        if self.peek() == Some('-') {
            self.chars.next();
            Ok(-self.parse_unary()?)
        } else {
            self.parse_primary()
        }
    }

    // primary := number | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, ValidationError> {
        match self.peek() {
            Some('(') => {
                self.chars.next();
                let value = self.parse_expr()?;
                if self.peek() != Some(')') {
                    return Err(self.error("missing closing parenthesis"));
                }
                self.chars.next();
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn parse_number(&mut self) -> Result<f64, ValidationError> {
        let mut literal = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() && c != '.' {
                break;
            }
            literal.push(c);
            self.chars.next();
        }
        literal
            .parse::<f64>()
            .map_err(|_| self.error(&format!("invalid number '{}'", literal)))
    }

    fn expect_end(&mut self) -> Result<(), ValidationError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(&format!("trailing input starting at '{}'", c))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap().result, 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap().result, 20.0);
        assert_eq!(evaluate("10 / 4").unwrap().result, 2.5);
    }

    #[test]
    fn test_unary_minus_and_power() {
        assert_eq!(evaluate("-3 + 5").unwrap().result, 2.0);
        assert_eq!(evaluate("2 ^ 10").unwrap().result, 1024.0);
        // Right-associative: 2^(3^2) = 512
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap().result, 512.0);
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate("1 / 0").unwrap_err();
        assert_eq!(err.kind(), "unparsable_expression");
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("(2 + 3").is_err());
        assert!(evaluate("2 3").is_err());
        assert!(evaluate("").is_err());
    }

    #[test]
    fn test_extract_arithmetic_from_prose() {
        let e = extract_arithmetic("what is 12 * (3 + 4)?").unwrap();
        assert_eq!(evaluate(&e).unwrap().result, 84.0);
    }

    #[test]
    fn test_extract_rejects_plain_prose() {
        assert!(extract_arithmetic("how are stock levels today").is_none());
        // A lone number with no operator is not arithmetic
        assert!(extract_arithmetic("aisle 3").is_none());
    }
}
