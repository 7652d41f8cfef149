//! Free-text expression evaluation
//!
//! Backs the "edit expression" action. The input is sanitized against a
//! character whitelist, tokenized and evaluated by a small recursive-descent
//! parser:
//!
//! ```text
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary | unary)*     juxtaposition multiplies
//! unary    := ('+' | '-') unary | power
//! power    := postfix ('^' unary)?                   right associative
//! postfix  := primary '!'*
//! primary  := number | constant | '(' expr ')' | function argument
//! argument := ('+' | '-')* primary
//! ```
//!
//! Display symbols (`×`, `÷`, `−`) are accepted as operators, `√` and `∛` as
//! prefix functions, and `π`/`pi`/`e` as constants. Trigonometric arguments
//! follow the angle mode.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scientific::ScientificFunction;
use crate::shared::errors::{CalcError, CalcResult};
use crate::shared::types::AngleMode;

// Anything outside this set is dropped before tokenizing
// Deepest chain of parentheses, signs, exponents or function arguments
const MAX_DEPTH: usize = 128;

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9A-Za-z\s+\-*/^().,!π√∛×÷−]").expect("Failed to compile whitelist pattern")
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    LParen,
    RParen,
    Root(ScientificFunction),
}

fn invalid(detail: impl Into<String>) -> CalcError {
    CalcError::InvalidExpression(detail.into())
}

/// Evaluate a free-text expression
///
/// Fails with `InvalidExpression` when the text does not parse or the result
/// is NaN or infinite.
pub fn evaluate(input: &str, mode: AngleMode) -> CalcResult<f64> {
    let sanitized = RE_DISALLOWED.replace_all(input, "");
    let tokens = tokenize(&sanitized)?;
    if tokens.is_empty() {
        return Err(invalid("empty expression"));
    }

    let mut parser = Parser { tokens, pos: 0, depth: 0, mode };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(invalid(format!("unexpected {:?}", token)));
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid("result is not a finite number"))
    }
}

fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' | ',' => {
                let (value, next) = scan_number(&chars, i)?;
                tokens.push(Token::Number(value));
                i = next;
                continue;
            }
            '+' => tokens.push(Token::Plus),
            '-' | '−' => tokens.push(Token::Minus),
            '*' | '×' => tokens.push(Token::Star),
            '/' | '÷' => tokens.push(Token::Slash),
            '^' => tokens.push(Token::Caret),
            '!' => tokens.push(Token::Bang),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '√' => tokens.push(Token::Root(ScientificFunction::Sqrt)),
            '∛' => tokens.push(Token::Root(ScientificFunction::Cbrt)),
            'π' => tokens.push(Token::Ident("π".to_string())),
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
                continue;
            }
            other => return Err(invalid(format!("unexpected character '{}'", other))),
        }
        i += 1;
    }

    Ok(tokens)
}

/// Scan a decimal number starting at `start`; ',' counts as a decimal point
///
/// An exponent is only taken when `e` is followed by a digit (optionally
/// signed), so "2e" still reads as 2 times e.
fn scan_number(chars: &[char], start: usize) -> CalcResult<(f64, usize)> {
    let mut text = String::new();
    let mut i = start;
    let mut seen_point = false;

    while i < chars.len() {
        match chars[i] {
            d @ '0'..='9' => text.push(d),
            '.' | ',' if !seen_point => {
                seen_point = true;
                text.push('.');
            }
            _ => break,
        }
        i += 1;
    }

    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let mut exponent = String::from("e");
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            exponent.push(chars[j]);
            j += 1;
        }
        let digits_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            exponent.push(chars[j]);
            j += 1;
        }
        if j > digits_start {
            text.push_str(&exponent);
            i = j;
        }
    }

    if text == "." {
        return Err(invalid("lone decimal point"));
    }
    text.parse::<f64>()
        .map(|value| (value, i))
        .map_err(|e| invalid(format!("bad number '{}': {}", text, e)))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    mode: AngleMode,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> CalcResult<f64>) -> CalcResult<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(invalid("expression nested too deeply"));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn starts_primary(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Number(_) | Token::Ident(_) | Token::LParen | Token::Root(_))
        )
    }

    fn expr(&mut self) -> CalcResult<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value += self.term()?;
            } else if self.eat(&Token::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> CalcResult<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                value *= self.unary()?;
            } else if self.eat(&Token::Slash) {
                value /= self.unary()?;
            } else if self.starts_primary() {
                value *= self.unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> CalcResult<f64> {
        if self.eat(&Token::Minus) {
            return Ok(-self.nested(Self::unary)?);
        }
        if self.eat(&Token::Plus) {
            return self.nested(Self::unary);
        }
        self.power()
    }

    fn power(&mut self) -> CalcResult<f64> {
        let base = self.postfix()?;
        if self.eat(&Token::Caret) {
            let exponent = self.nested(Self::unary)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> CalcResult<f64> {
        let mut value = self.primary()?;
        while self.eat(&Token::Bang) {
            value = self.apply(ScientificFunction::Fact, value)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> CalcResult<f64> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.nested(Self::expr)?;
                if !self.eat(&Token::RParen) {
                    return Err(invalid("missing ')'"));
                }
                Ok(value)
            }
            Some(Token::Root(function)) => {
                let argument = self.nested(Self::argument)?;
                self.apply(function, argument)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(token) => Err(invalid(format!("unexpected {:?}", token))),
            None => Err(invalid("unexpected end of expression")),
        }
    }

    fn argument(&mut self) -> CalcResult<f64> {
        if self.eat(&Token::Minus) {
            return Ok(-self.nested(Self::argument)?);
        }
        if self.eat(&Token::Plus) {
            return self.nested(Self::argument);
        }
        self.primary()
    }

    fn identifier(&mut self, name: &str) -> CalcResult<f64> {
        match ScientificFunction::from_name(name) {
            Some(ScientificFunction::Pi) => Ok(std::f64::consts::PI),
            Some(ScientificFunction::E) => Ok(std::f64::consts::E),
            Some(function) if function.is_nullary() || function.deferred_operator().is_some() => {
                Err(invalid(format!("'{}' is not available in expressions", name)))
            }
            Some(function) => {
                let argument = self.nested(Self::argument)?;
                self.apply(function, argument)
            }
            None => Err(invalid(format!("unknown name '{}'", name))),
        }
    }

    fn apply(&self, function: ScientificFunction, argument: f64) -> CalcResult<f64> {
        function
            .evaluate(argument, self.mode)
            .map_err(|e| invalid(format!("{}: {}", function.name(), e)))
    }
}
