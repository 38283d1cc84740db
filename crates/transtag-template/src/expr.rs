//! Expression parsing and evaluation.
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparisons and `in`,
//! `+ -`, `* / %`, unary `-`, then attribute access and filters.

use crate::context::ExecutionContext;
use crate::error::{TemplateError, TemplateResult};
use crate::stream::TokenStream;
use crate::token::TokenKind;
use crate::value::{compare, is_truthy, length, loose_eq, to_output};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`, also concatenates when either side is a string
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `and`
    And,
    /// `or`
    Or,
}

/// Built-in filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Characters, items or keys
    Length,
    /// Uppercase text
    Upper,
    /// Lowercase text
    Lower,
    /// The argument when the value is falsy
    Default,
}

impl Filter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Self::Length),
            "upper" => Some(Self::Upper),
            "lower" => Some(Self::Lower),
            "default" => Some(Self::Default),
            _ => None,
        }
    }

    const fn takes_argument(self) -> bool {
        matches!(self, Self::Default)
    }
}

/// A parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value
    Literal(Value),
    /// A variable looked up in the render context
    Variable(String),
    /// `base.name` or `base.0`
    Attribute(Box<Expr>, String),
    /// `not expr`
    Not(Box<Expr>),
    /// `-expr`
    Neg(Box<Expr>),
    /// `left op right`
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `expr|filter` or `expr|filter:arg`
    Filter(Box<Expr>, Filter, Option<Box<Expr>>),
}

impl Expr {
    /// Evaluate against the scopes of `ctx`
    pub fn evaluate(&self, ctx: &ExecutionContext) -> TemplateResult<Value> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Variable(name) => Ok(ctx.get(name).cloned().unwrap_or(Value::Null)),
            Self::Attribute(base, key) => Ok(attribute(&base.evaluate(ctx)?, key)),
            Self::Not(inner) => Ok(Value::Bool(!is_truthy(&inner.evaluate(ctx)?))),
            Self::Neg(inner) => negate(&inner.evaluate(ctx)?),
            Self::Binary(BinaryOp::And, left, right) => {
                let result = is_truthy(&left.evaluate(ctx)?) && is_truthy(&right.evaluate(ctx)?);
                Ok(Value::Bool(result))
            }
            Self::Binary(BinaryOp::Or, left, right) => {
                let result = is_truthy(&left.evaluate(ctx)?) || is_truthy(&right.evaluate(ctx)?);
                Ok(Value::Bool(result))
            }
            Self::Binary(op, left, right) => binary(*op, &left.evaluate(ctx)?, &right.evaluate(ctx)?),
            Self::Filter(inner, filter, arg) => {
                let value = inner.evaluate(ctx)?;
                Ok(match filter {
                    Filter::Length => Value::from(length(&value)),
                    Filter::Upper => Value::String(to_output(&value).to_uppercase()),
                    Filter::Lower => Value::String(to_output(&value).to_lowercase()),
                    Filter::Default if is_truthy(&value) => value,
                    Filter::Default => match arg {
                        Some(arg) => arg.evaluate(ctx)?,
                        None => Value::Null,
                    },
                })
            }
        }
    }
}

fn attribute(base: &Value, key: &str) -> Value {
    match base {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
        _ => None,
    }
    .unwrap_or(Value::Null)
}

fn negate(value: &Value) -> TemplateResult<Value> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(i64::checked_neg)
            .map(Value::from)
            .or_else(|| n.as_f64().map(|f| Value::from(-f)))
            .ok_or_else(|| TemplateError::render(format!("cannot negate {n}"))),
        other => Err(TemplateError::render(format!("cannot negate {other}"))),
    }
}

enum Operands {
    Int(i64, i64),
    Float(f64, f64),
}

fn numeric(left: &Value, right: &Value) -> Option<Operands> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return None;
    };
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => Some(Operands::Int(a, b)),
        _ => Some(Operands::Float(a.as_f64()?, b.as_f64()?)),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> TemplateResult<Value> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(loose_eq(left, right))),
        BinaryOp::Ne => return Ok(Value::Bool(!loose_eq(left, right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(left, right)
                .ok_or_else(|| TemplateError::render(format!("cannot compare {left} and {right}")))?;
            let result = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            return Ok(Value::Bool(result));
        }
        BinaryOp::In => return contains(right, left).map(Value::Bool),
        BinaryOp::NotIn => return contains(right, left).map(|found| Value::Bool(!found)),
        BinaryOp::Add if left.is_string() || right.is_string() => {
            return Ok(Value::String(to_output(left) + &to_output(right)));
        }
        _ => {}
    }

    let operands = numeric(left, right)
        .ok_or_else(|| TemplateError::render(format!("{op:?} needs numbers, got {left} and {right}")))?;
    match operands {
        Operands::Int(a, b) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div if b == 0 => return Err(TemplateError::render("division by zero")),
                BinaryOp::Div => a.checked_div(b),
                BinaryOp::Rem if b == 0 => return Err(TemplateError::render("division by zero")),
                BinaryOp::Rem => a.checked_rem(b),
                _ => None,
            };
            result
                .map(Value::from)
                .ok_or_else(|| TemplateError::render(format!("integer overflow in {op:?}")))
        }
        Operands::Float(a, b) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => a % b,
            };
            Number::from_f64(result)
                .map(Value::Number)
                .ok_or_else(|| TemplateError::render(format!("{op:?} produced {result}")))
        }
    }
}

fn contains(haystack: &Value, needle: &Value) -> TemplateResult<bool> {
    match haystack {
        Value::String(s) => Ok(s.contains(&to_output(needle))),
        Value::Array(items) => Ok(items.iter().any(|item| loose_eq(item, needle))),
        Value::Object(map) => Ok(map.contains_key(&to_output(needle))),
        other => Err(TemplateError::render(format!("cannot search in {other}"))),
    }
}

/// Parse an expression from the current position of `stream`
pub(crate) fn parse(stream: &mut TokenStream) -> TemplateResult<Expr> {
    parse_or(stream)
}

fn parse_or(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let mut left = parse_and(stream)?;
    while stream.match_token(TokenKind::Keyword, "or").is_some() {
        let right = parse_and(stream)?;
        left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let mut left = parse_not(stream)?;
    while stream.match_token(TokenKind::Keyword, "and").is_some() {
        let right = parse_not(stream)?;
        left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_not(stream: &mut TokenStream) -> TemplateResult<Expr> {
    if stream.match_token(TokenKind::Keyword, "not").is_some() {
        return Ok(Expr::Not(Box::new(parse_not(stream)?)));
    }
    parse_comparison(stream)
}

fn comparison_op(stream: &mut TokenStream) -> Option<BinaryOp> {
    if stream.peek(TokenKind::Keyword, "not").is_some()
        && stream.peek_n(1, TokenKind::Keyword, "in").is_some()
    {
        stream.consume_n(2);
        return Some(BinaryOp::NotIn);
    }
    if stream.match_token(TokenKind::Keyword, "in").is_some() {
        return Some(BinaryOp::In);
    }
    let token = stream.peek_type(TokenKind::Symbol)?;
    let op = match token.value.as_str() {
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        _ => return None,
    };
    stream.consume();
    Some(op)
}

fn parse_comparison(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let left = parse_additive(stream)?;
    match comparison_op(stream) {
        Some(op) => {
            let right = parse_additive(stream)?;
            Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
        }
        None => Ok(left),
    }
}

fn symbol_op(stream: &mut TokenStream, ops: &[(&str, BinaryOp)]) -> Option<BinaryOp> {
    let token = stream.peek_type(TokenKind::Symbol)?;
    let op = ops
        .iter()
        .find(|(symbol, _)| token.value == *symbol)
        .map(|(_, op)| *op)?;
    stream.consume();
    Some(op)
}

fn parse_additive(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let mut left = parse_term(stream)?;
    while let Some(op) = symbol_op(stream, &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)]) {
        let right = parse_term(stream)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_term(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let mut left = parse_unary(stream)?;
    while let Some(op) = symbol_op(
        stream,
        &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Rem)],
    ) {
        let right = parse_unary(stream)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_unary(stream: &mut TokenStream) -> TemplateResult<Expr> {
    if stream.match_token(TokenKind::Symbol, "-").is_some() {
        return Ok(Expr::Neg(Box::new(parse_unary(stream)?)));
    }
    parse_postfix(stream)
}

fn parse_postfix(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let mut expr = parse_primary(stream)?;
    loop {
        if stream.match_token(TokenKind::Symbol, ".").is_some() {
            let key = stream
                .match_type(TokenKind::Identifier)
                .or_else(|| stream.match_type(TokenKind::Number))
                .ok_or_else(|| stream.error("Expected an attribute name or index after '.'"))?;
            expr = Expr::Attribute(Box::new(expr), key.value);
        } else if stream.match_token(TokenKind::Symbol, "|").is_some() {
            let name = stream
                .match_type(TokenKind::Identifier)
                .ok_or_else(|| stream.error("Expected a filter name after '|'"))?;
            let filter = Filter::from_name(&name.value).ok_or_else(|| {
                TemplateError::syntax(name.line, name.col, format!("Unknown filter '{}'", name.value))
            })?;
            let arg = if filter.takes_argument() && stream.match_token(TokenKind::Symbol, ":").is_some() {
                Some(Box::new(parse_postfix(stream)?))
            } else {
                None
            };
            expr = Expr::Filter(Box::new(expr), filter, arg);
        } else {
            return Ok(expr);
        }
    }
}

fn parse_primary(stream: &mut TokenStream) -> TemplateResult<Expr> {
    let Some(token) = stream.current().cloned() else {
        return Err(stream.error("Expected an expression"));
    };

    let expr = match token.kind {
        TokenKind::String => Expr::Literal(Value::String(token.value)),
        TokenKind::Number => Expr::Literal(parse_number(&token.value).ok_or_else(|| {
            TemplateError::syntax(token.line, token.col, format!("Invalid number '{}'", token.value))
        })?),
        TokenKind::Identifier => Expr::Variable(token.value),
        TokenKind::Keyword => match token.value.as_str() {
            "true" => Expr::Literal(Value::Bool(true)),
            "false" => Expr::Literal(Value::Bool(false)),
            "nil" => Expr::Literal(Value::Null),
            _ => return Err(stream.error(format!("Unexpected keyword '{}'", token.value))),
        },
        TokenKind::Symbol if token.value == "(" => {
            stream.consume();
            let inner = parse(stream)?;
            stream
                .match_token(TokenKind::Symbol, ")")
                .ok_or_else(|| stream.error("Expected ')'"))?;
            return Ok(inner);
        }
        _ => return Err(stream.error(format!("Unexpected {token}"))),
    };
    stream.consume();
    Ok(expr)
}

fn parse_number(raw: &str) -> Option<Value> {
    if raw.contains('.') {
        raw.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
    } else {
        raw.parse::<i64>().ok().map(Value::from)
    }
}
