//! Four-function arithmetic over decimal numbers.
//!
//! Grammar (left associative, usual precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | '(' expr ')'
//! ```
//!
//! `×` and `÷` are accepted as aliases for `*` and `/`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::error::WebToolsError;
use crate::types::{with_metadata, ComputationOutput};
use crate::WebToolsResult;

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInput {
    pub expression: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub expression: String,
    pub value: Decimal,
}

pub fn calculate(input: &CalculationInput) -> WebToolsResult<ComputationOutput<CalculationOutput>> {
    let start = Instant::now();
    let value = evaluate(&input.expression)?;

    let output = CalculationOutput {
        expression: input.expression.trim().to_string(),
        value: value.normalize(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Recursive-descent evaluation in 128-bit decimal arithmetic",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> WebToolsResult<Decimal> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(parse_error(expression, 0, "expression is empty"));
    }

    let mut parser = Parser {
        source: expression,
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some((offset, _)) = parser.peek() {
        return Err(parse_error(expression, offset, "unexpected trailing input"));
    }
    Ok(value)
}

fn parse_error(source: &str, position: usize, reason: &str) -> WebToolsError {
    WebToolsError::Parse {
        input: source.to_string(),
        position,
        reason: reason.to_string(),
    }
}

fn tokenize(source: &str) -> WebToolsResult<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = offset;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &source[offset..end];
                let value = Decimal::from_str(literal)
                    .map_err(|_| parse_error(source, offset, "malformed number"))?;
                tokens.push((offset, Token::Number(value)));
                continue;
            }
            '+' => Token::Plus,
            '-' | '−' => Token::Minus,
            '*' | '×' => Token::Star,
            '/' | '÷' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => return Err(parse_error(source, offset, "unexpected character")),
        };
        chars.next();
        tokens.push((offset, token));
    }

    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(usize, &Token)> {
        self.tokens.get(self.pos).map(|(o, t)| (*o, t))
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_offset(&self) -> usize {
        self.source.len()
    }

    fn expr(&mut self) -> WebToolsResult<Decimal> {
        let mut acc = self.term()?;
        while let Some((_, tok)) = self.peek() {
            let add = match tok {
                Token::Plus => true,
                Token::Minus => false,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            let next = if add {
                acc.checked_add(rhs)
            } else {
                acc.checked_sub(rhs)
            };
            acc = next.ok_or_else(overflow)?;
        }
        Ok(acc)
    }

    fn term(&mut self) -> WebToolsResult<Decimal> {
        let mut acc = self.unary()?;
        while let Some((_, tok)) = self.peek() {
            let multiply = match tok {
                Token::Star => true,
                Token::Slash => false,
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            acc = if multiply {
                acc.checked_mul(rhs).ok_or_else(overflow)?
            } else {
                if rhs.is_zero() {
                    return Err(WebToolsError::DivisionByZero {
                        context: format!("expression '{}'", self.source.trim()),
                    });
                }
                acc.checked_div(rhs).ok_or_else(overflow)?
            };
        }
        Ok(acc)
    }

    fn unary(&mut self) -> WebToolsResult<Decimal> {
        match self.peek() {
            Some((_, Token::Minus)) => {
                self.advance();
                Ok(-self.nested(Self::unary)?)
            }
            Some((_, Token::Plus)) => {
                self.advance();
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> WebToolsResult<Decimal> {
        match self.advance() {
            Some((_, Token::Number(value))) => Ok(value),
            Some((offset, Token::LParen)) => {
                let value = self.nested(Self::expr)?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(value),
                    Some((o, _)) => Err(parse_error(self.source, o, "expected ')'")),
                    None => Err(parse_error(
                        self.source,
                        offset,
                        "unclosed '('",
                    )),
                }
            }
            Some((offset, _)) => Err(parse_error(self.source, offset, "expected a number or '('")),
            None => Err(parse_error(
                self.source,
                self.end_offset(),
                "unexpected end of expression",
            )),
        }
    }

    fn nested(
        &mut self,
        rule: fn(&mut Self) -> WebToolsResult<Decimal>,
    ) -> WebToolsResult<Decimal> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let offset = self.peek().map(|(o, _)| o).unwrap_or_else(|| self.end_offset());
            return Err(parse_error(self.source, offset, "expression nested too deeply"));
        }
        let value = rule(self);
        self.depth -= 1;
        value
    }
}

fn overflow() -> WebToolsError {
    WebToolsError::invalid("expression", "result is outside the decimal range")
}
