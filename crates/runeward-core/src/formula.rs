//! Arithmetic formula evaluation over roll data
//!
//! Authored rule values may be string formulas such as
//! `"@actor.attributes.speed.total / 2 + 5"`. A formula is tokenized
//! and evaluated in one pass against a read-only roll-data view.
//! References that resolve to nothing (or to a non-numeric value)
//! evaluate to 0; a formula that fails to parse evaluates to `None`,
//! which callers treat as a validation failure on the owning rule.

use crate::value::{resolve_path, ValueMap};

/// Evaluate a formula string against roll data
///
/// Returns `None` on malformed input. The returned number is not
/// guaranteed finite (e.g. division by zero); callers must coerce and
/// validate before use.
pub fn evaluate(formula: &str, roll_data: &ValueMap) -> Option<f64> {
    let tokens = tokenize(formula)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        roll_data,
    };
    let result = parser.expression()?;
    if parser.pos != tokens.len() {
        return None;
    }
    Some(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    /// `@dotted.path` reference into roll data
    Path(String),
    /// Function name (floor, ceil, min, max)
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '@' => {
                chars.next();
                let mut path = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        path.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if path.is_empty() {
                    return None;
                }
                tokens.push(Token::Path(path));
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(text.parse().ok()?));
            }
            c if c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

/// Recursive-descent evaluator: expression > term > unary > primary
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    roll_data: &'a ValueMap,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn expect(&mut self, token: Token) -> Option<()> {
        if self.advance()? == &token {
            Some(())
        } else {
            None
        }
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.advance();
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.advance();
                    value /= self.unary()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            return Some(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<f64> {
        match self.advance()?.clone() {
            Token::Number(n) => Some(n),
            Token::Path(path) => Some(
                resolve_path(self.roll_data, &path)
                    .and_then(|v| v.as_float())
                    .unwrap_or(0.0),
            ),
            Token::LParen => {
                let value = self.expression()?;
                self.expect(Token::RParen)?;
                Some(value)
            }
            Token::Ident(name) => {
                self.expect(Token::LParen)?;
                let first = self.expression()?;
                match name.as_str() {
                    "floor" => {
                        self.expect(Token::RParen)?;
                        Some(first.floor())
                    }
                    "ceil" => {
                        self.expect(Token::RParen)?;
                        Some(first.ceil())
                    }
                    "min" => {
                        self.expect(Token::Comma)?;
                        let second = self.expression()?;
                        self.expect(Token::RParen)?;
                        Some(first.min(second))
                    }
                    "max" => {
                        self.expect(Token::Comma)?;
                        let second = self.expression()?;
                        self.expect(Token::RParen)?;
                        Some(first.max(second))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
