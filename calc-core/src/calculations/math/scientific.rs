//! Scientific calculator: expression evaluation plus calculator state.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := postfix ('^' unary)?          right associative
//! postfix := primary ('!' | '%')*          factorial, percent
//! primary := number | constant | function '(' expr ')' | '(' expr ')'
//! ```
//!
//! `-2^2` is `-4`. Constants are `pi`, `e` and `ans` (the previous result).

use std::f64::consts::{E, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcResult, ValidationError};
use crate::history::History;
use crate::presentation::{Present, Report};

const FIELD: &str = "expression";
const MAX_FACTORIAL: f64 = 170.0;
// Parentheses, function calls and prefix signs each add one level.
const MAX_NESTING: usize = 256;

/// Unit for trigonometric arguments and inverse-trig results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    fn to_radians(
        self,
        value: f64,
    ) -> f64 {
        match self {
            Self::Degrees => value.to_radians(),
            Self::Radians => value,
        }
    }

    fn from_radians(
        self,
        value: f64,
    ) -> f64 {
        match self {
            Self::Degrees => value.to_degrees(),
            Self::Radians => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

fn syntax_error(message: impl Into<String>) -> ValidationError {
    ValidationError::invalid(FIELD, message)
}

fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1.5e3, 2e-4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| syntax_error(format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() && c != 'π' => {
                let start = i;
                while i < chars.len() && chars[i].is_alphanumeric() {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(name.to_ascii_lowercase()));
            }
            'π' => {
                tokens.push(Token::Ident("pi".to_string()));
                i += 1;
            }
            '+' | '-' | '*' | '/' | '^' | '!' | '%' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '×' => {
                tokens.push(Token::Op('*'));
                i += 1;
            }
            '÷' => {
                tokens.push(Token::Op('/'));
                i += 1;
            }
            '−' => {
                tokens.push(Token::Op('-'));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            other => return Err(syntax_error(format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    angle_mode: AngleMode,
    ans: f64,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_op(
        &mut self,
        op: char,
    ) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> CalcResult<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat_op('+') {
                value += self.term()?;
            } else if self.eat_op('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> CalcResult<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat_op('*') {
                value *= self.unary()?;
            } else if self.eat_op('/') {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(syntax_error("division by zero"));
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> CalcResult<f64> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(syntax_error("expression is nested too deeply"));
        }
        let value = if self.eat_op('-') {
            self.unary().map(|v| -v)
        } else if self.eat_op('+') {
            self.unary()
        } else {
            self.power()
        };
        self.depth -= 1;
        value
    }

    fn power(&mut self) -> CalcResult<f64> {
        let base = self.postfix()?;
        if self.eat_op('^') {
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn postfix(&mut self) -> CalcResult<f64> {
        let mut value = self.primary()?;
        loop {
            if self.eat_op('!') {
                value = factorial(value)?;
            } else if self.eat_op('%') {
                value /= 100.0;
            } else {
                return Ok(value);
            }
        }
    }

    fn primary(&mut self) -> CalcResult<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(syntax_error("missing closing parenthesis")),
                }
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "pi" => Ok(PI),
                "e" => Ok(E),
                "ans" => Ok(self.ans),
                _ => {
                    if self.next() != Some(Token::LParen) {
                        return Err(syntax_error(format!("unknown identifier '{name}'")));
                    }
                    let argument = self.expr()?;
                    if self.next() != Some(Token::RParen) {
                        return Err(syntax_error("missing closing parenthesis"));
                    }
                    self.apply_function(&name, argument)
                }
            },
            Some(Token::RParen) => Err(syntax_error("unexpected ')'")),
            Some(Token::Op(op)) => Err(syntax_error(format!("unexpected operator '{op}'"))),
            None => Err(syntax_error("unexpected end of expression")),
        }
    }

    fn apply_function(
        &self,
        name: &str,
        x: f64,
    ) -> CalcResult<f64> {
        let mode = self.angle_mode;
        let domain = |ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(syntax_error(format!("{name} is undefined for {x}")))
            }
        };
        match name {
            "sin" => Ok(mode.to_radians(x).sin()),
            "cos" => Ok(mode.to_radians(x).cos()),
            "tan" => {
                let cos = mode.to_radians(x).cos();
                domain(cos.abs() > 1e-12)?;
                Ok(mode.to_radians(x).tan())
            }
            "asin" => {
                domain((-1.0..=1.0).contains(&x))?;
                Ok(mode.from_radians(x.asin()))
            }
            "acos" => {
                domain((-1.0..=1.0).contains(&x))?;
                Ok(mode.from_radians(x.acos()))
            }
            "atan" => Ok(mode.from_radians(x.atan())),
            "sqrt" => {
                domain(x >= 0.0)?;
                Ok(x.sqrt())
            }
            "cbrt" => Ok(x.cbrt()),
            "ln" => {
                domain(x > 0.0)?;
                Ok(x.ln())
            }
            "log" => {
                domain(x > 0.0)?;
                Ok(x.log10())
            }
            "abs" => Ok(x.abs()),
            "exp" => Ok(x.exp()),
            _ => Err(syntax_error(format!("unknown function '{name}'"))),
        }
    }
}

fn factorial(n: f64) -> CalcResult<f64> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(syntax_error(
            "factorial requires a non-negative whole number",
        ));
    }
    if n > MAX_FACTORIAL {
        return Err(syntax_error("factorial argument is too large"));
    }
    Ok((1..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

/// Snaps floating-point noise such as `sin(180°) = 1.2e-16` to zero.
fn clean(value: f64) -> f64 {
    if value.abs() < 1e-12 { 0.0 } else { value }
}

/// Evaluates `expression` with `ans` bound to zero.
///
/// ```
/// use calc_core::calculations::math::scientific::{AngleMode, evaluate};
///
/// assert_eq!(evaluate("2 + 3 * 4", AngleMode::Degrees).unwrap(), 14.0);
/// assert_eq!(evaluate("sin(90)", AngleMode::Degrees).unwrap(), 1.0);
/// ```
pub fn evaluate(
    expression: &str,
    angle_mode: AngleMode,
) -> CalcResult<f64> {
    evaluate_with_ans(expression, angle_mode, 0.0)
}

fn evaluate_with_ans(
    expression: &str,
    angle_mode: AngleMode,
    ans: f64,
) -> CalcResult<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ValidationError::required(FIELD));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        angle_mode,
        ans,
    };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        let message = match token {
            Token::RParen => "unbalanced parentheses".to_string(),
            other => format!("unexpected {other:?} after expression"),
        };
        return Err(syntax_error(message));
    }
    if !value.is_finite() {
        return Err(syntax_error("result is not a finite number"));
    }
    Ok(clean(value))
}

/// Formats a result with up to ten decimals and no trailing zeros.
pub fn format_result(value: f64) -> String {
    if value.abs() >= 1e15 || (value != 0.0 && value.abs() < 1e-10) {
        return format!("{value:e}");
    }
    let s = format!("{value:.10}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// One successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub expression: String,
    pub value: f64,
}

impl fmt::Display for Evaluation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} = {}", self.expression.trim(), format_result(self.value))
    }
}

impl Present for Evaluation {
    fn report(&self) -> Report {
        Report::new("Scientific Calculator")
            .line("Expression", self.expression.trim())
            .line("Result", format_result(self.value))
    }
}

/// Calculator state that outlives a single evaluation: angle mode, memory
/// register, last answer and the history list.
#[derive(Debug, Clone)]
pub struct ScientificCalculator {
    pub angle_mode: AngleMode,
    memory: f64,
    last_answer: f64,
    history: History,
}

impl Default for ScientificCalculator {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}

impl ScientificCalculator {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self::with_history(angle_mode, History::calculator())
    }

    /// Resumes with a previously persisted history.
    pub fn with_history(
        angle_mode: AngleMode,
        history: History,
    ) -> Self {
        Self {
            angle_mode,
            memory: 0.0,
            last_answer: 0.0,
            history,
        }
    }

    /// Evaluates an expression, records it in the history, and makes its
    /// value available as `ans`. Failed evaluations leave state untouched.
    pub fn evaluate(
        &mut self,
        expression: &str,
    ) -> CalcResult<Evaluation> {
        let value = evaluate_with_ans(expression, self.angle_mode, self.last_answer)?;
        let evaluation = Evaluation {
            expression: expression.trim().to_string(),
            value,
        };
        self.last_answer = value;
        self.history.push(evaluation.to_string());
        Ok(evaluation)
    }

    pub fn last_answer(&self) -> f64 {
        self.last_answer
    }

    /// `M+`
    pub fn memory_add(
        &mut self,
        value: f64,
    ) {
        self.memory += value;
    }

    /// `M-`
    pub fn memory_subtract(
        &mut self,
        value: f64,
    ) {
        self.memory -= value;
    }

    /// `MR`
    pub fn memory_recall(&self) -> f64 {
        self.memory
    }

    /// `MC`
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
