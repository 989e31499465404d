//! Numeric expression evaluation for typed command input.

use std::f64::consts::{E, PI};
use thiserror::Error;

/// Deepest nesting of parentheses and unary signs accepted.
pub const MAX_DEPTH: usize = 256;

/// Errors produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Empty expression")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("Unbalanced parenthesis")]
    UnbalancedParenthesis,
    #[error("Result is not a finite number")]
    NotFinite,
    #[error("Expression nested deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Parses text into a number.
pub trait Evaluator {
    fn eval(&self, text: &str) -> Result<f64, EvalError>;
}

/// Arithmetic evaluator with the usual operators, constants and functions.
///
/// Supports `+ - * / % ^`, unary signs, parentheses, `pi`, `e` and
/// `sin cos tan asin acos atan sqrt abs ln log exp floor ceil round`.
/// Trigonometric functions work in radians.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathEvaluator;

impl Evaluator for MathEvaluator {
    fn eval(&self, text: &str) -> Result<f64, EvalError> {
        eval(text)
    }
}

/// Evaluate an expression with [`MathEvaluator`] semantics.
pub fn eval(text: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(match token.kind {
            TokenKind::RParen => EvalError::UnbalancedParenthesis,
            _ => parser.unexpected(),
        });
    }
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NotFinite)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

impl Token {
    fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Op(op) => op.to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let start = i;
        match ch {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when digits follow: "2e" is not 2*e
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| EvalError::UnexpectedToken { found: literal.clone(), pos: start })?;
                tokens.push(Token { kind: TokenKind::Number(value), pos: start });
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect::<String>().to_lowercase();
                tokens.push(Token { kind: TokenKind::Ident(name), pos: start });
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token { kind: TokenKind::Op(ch), pos: start });
                i += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, pos: start });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, pos: start });
                i += 1;
            }
            _ => return Err(EvalError::UnexpectedChar { ch, pos: start }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    fn peek_op(&self) -> Option<char> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn unexpected(&self) -> EvalError {
        match self.peek() {
            Some(token) => EvalError::UnexpectedToken {
                found: token.describe(),
                pos: token.pos,
            },
            None => EvalError::UnexpectedEnd,
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.index += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek_op() {
            self.index += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // unary := ('+' | '-') unary | power
    // All recursion passes through here.
    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, EvalError> {
        match self.peek_op() {
            Some('-') => {
                self.index += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.index += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // power := primary ('^' unary)?
    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        if self.peek_op() == Some('^') {
            self.index += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        let Some(token) = self.advance() else {
            return Err(EvalError::UnexpectedEnd);
        };
        match token.kind {
            TokenKind::Number(value) => Ok(value),
            TokenKind::LParen => {
                let value = self.expression()?;
                self.close_paren()?;
                Ok(value)
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
                    self.index += 1;
                    let arg = self.expression()?;
                    self.close_paren()?;
                    apply_function(&name, arg)
                } else {
                    constant(&name)
                }
            }
            TokenKind::RParen => Err(EvalError::UnbalancedParenthesis),
            TokenKind::Op(_) => {
                self.index -= 1;
                Err(self.unexpected())
            }
        }
    }

    fn close_paren(&mut self) -> Result<(), EvalError> {
        match self.advance() {
            Some(Token { kind: TokenKind::RParen, .. }) => Ok(()),
            Some(token) => Err(EvalError::UnexpectedToken {
                found: token.describe(),
                pos: token.pos,
            }),
            None => Err(EvalError::UnbalancedParenthesis),
        }
    }
}

fn constant(name: &str) -> Result<f64, EvalError> {
    match name {
        "pi" => Ok(PI),
        "e" => Ok(E),
        _ => Err(EvalError::UnknownIdentifier(name.to_string())),
    }
}

fn apply_function(name: &str, arg: f64) -> Result<f64, EvalError> {
    let value = match name {
        "sin" => arg.sin(),
        "cos" => arg.cos(),
        "tan" => arg.tan(),
        "asin" => arg.asin(),
        "acos" => arg.acos(),
        "atan" => arg.atan(),
        "sqrt" => arg.sqrt(),
        "abs" => arg.abs(),
        "ln" => arg.ln(),
        "log" => arg.log10(),
        "exp" => arg.exp(),
        "floor" => arg.floor(),
        "ceil" => arg.ceil(),
        "round" => arg.round(),
        _ => return Err(EvalError::UnknownIdentifier(name.to_string())),
    };
    Ok(value)
}
