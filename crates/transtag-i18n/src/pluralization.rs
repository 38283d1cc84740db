//! Plural form selection from gettext `Plural-Forms` headers
//!
//! A catalog header such as `nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : 2);`
//! is compiled once into a [`PluralRule`] and evaluated per lookup.

use once_cell::sync::Lazy;
use std::fmt;
use thiserror::Error;

/// Rule used when a catalog carries no usable `Plural-Forms` header: `n != 1`.
static DEFAULT_RULE: Lazy<PluralRule> = Lazy::new(|| PluralRule {
    nplurals: 2,
    expr: Expr::Binary(BinaryOp::Ne, Box::new(Expr::N), Box::new(Expr::Const(1))),
});

/// Errors raised while compiling a `Plural-Forms` header
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluralRuleError {
    /// `nplurals=` missing or not a positive integer
    #[error("missing or invalid nplurals")]
    InvalidCount,

    /// `plural=` missing
    #[error("missing plural expression")]
    MissingExpression,

    /// The expression does not parse
    #[error("invalid plural expression at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

/// A compiled plural rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
    nplurals: usize,
    expr: Expr,
}

impl Default for PluralRule {
    fn default() -> Self {
        DEFAULT_RULE.clone()
    }
}

impl PluralRule {
    /// Compile the value of a `Plural-Forms` header
    pub fn parse(header: &str) -> Result<Self, PluralRuleError> {
        let mut nplurals = None;
        let mut expression = None;

        for part in header.split(';') {
            let part = part.trim();
            if let Some(value) = part.strip_prefix("nplurals") {
                let value = value.trim_start().strip_prefix('=').unwrap_or(value);
                nplurals = value.trim().parse::<usize>().ok().filter(|n| *n > 0);
                if nplurals.is_none() {
                    return Err(PluralRuleError::InvalidCount);
                }
            } else if let Some(value) = part.strip_prefix("plural") {
                let value = value.trim_start();
                if let Some(value) = value.strip_prefix('=') {
                    expression = Some(value.trim());
                }
            }
        }

        let nplurals = nplurals.ok_or(PluralRuleError::InvalidCount)?;
        let expression = expression.ok_or(PluralRuleError::MissingExpression)?;
        let expr = ExprParser::new(expression).parse()?;

        Ok(Self { nplurals, expr })
    }

    /// Number of plural forms declared by the catalog
    pub const fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// Index of the plural form for `n`, or `None` when the rule yields a form the catalog does not declare
    pub fn index(&self, n: i64) -> Option<usize> {
        usize::try_from(self.expr.eval(n))
            .ok()
            .filter(|index| *index < self.nplurals)
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nplurals={}; plural={};", self.nplurals, self.expr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    N,
    Const(i64),
    Not(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, n: i64) -> i64 {
        match self {
            Self::N => n,
            Self::Const(value) => *value,
            Self::Not(inner) => i64::from(inner.eval(n) == 0),
            Self::Ternary(cond, then, otherwise) => {
                if cond.eval(n) == 0 {
                    otherwise.eval(n)
                } else {
                    then.eval(n)
                }
            }
            Self::Binary(op, lhs, rhs) => {
                let l = lhs.eval(n);
                // || and && short-circuit like C
                match op {
                    BinaryOp::Or if l != 0 => return 1,
                    BinaryOp::And if l == 0 => return 0,
                    _ => {}
                }
                let r = rhs.eval(n);
                match op {
                    BinaryOp::Or | BinaryOp::And => i64::from(r != 0),
                    BinaryOp::Eq => i64::from(l == r),
                    BinaryOp::Ne => i64::from(l != r),
                    BinaryOp::Lt => i64::from(l < r),
                    BinaryOp::Le => i64::from(l <= r),
                    BinaryOp::Gt => i64::from(l > r),
                    BinaryOp::Ge => i64::from(l >= r),
                    BinaryOp::Add => l.wrapping_add(r),
                    BinaryOp::Sub => l.wrapping_sub(r),
                    BinaryOp::Mul => l.wrapping_mul(r),
                    BinaryOp::Div => l.checked_div(r).unwrap_or(0),
                    BinaryOp::Rem => l.checked_rem(r).unwrap_or(0),
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::N => write!(f, "n"),
            Self::Const(value) => write!(f, "{value}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Ternary(cond, then, otherwise) => write!(f, "({cond} ? {then} : {otherwise})"),
        }
    }
}

/// Recursive-descent parser over the C subset gettext allows in `plural=`
struct ExprParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Expr, PluralRuleError> {
        let expr = self.ternary()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    fn error(&self, message: &str) -> PluralRuleError {
        PluralRuleError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ternary(&mut self) -> Result<Expr, PluralRuleError> {
        let cond = self.binary(0)?;
        if !self.eat("?") {
            return Ok(cond);
        }
        let then = self.ternary()?;
        if !self.eat(":") {
            return Err(self.error("expected ':'"));
        }
        let otherwise = self.ternary()?;
        Ok(Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)))
    }

    /// Precedence climbing; each level lists its operators, longest spelling first.
    fn binary(&mut self, level: usize) -> Result<Expr, PluralRuleError> {
        const LEVELS: &[&[(&str, BinaryOp)]] = &[
            &[("||", BinaryOp::Or)],
            &[("&&", BinaryOp::And)],
            &[("==", BinaryOp::Eq), ("!=", BinaryOp::Ne)],
            &[
                ("<=", BinaryOp::Le),
                (">=", BinaryOp::Ge),
                ("<", BinaryOp::Lt),
                (">", BinaryOp::Gt),
            ],
            &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
            &[("*", BinaryOp::Mul), ("/", BinaryOp::Div), ("%", BinaryOp::Rem)],
        ];

        let Some(operators) = LEVELS.get(level) else {
            return self.unary();
        };

        let mut lhs = self.binary(level + 1)?;
        'outer: loop {
            for (symbol, op) in *operators {
                if self.eat(symbol) {
                    let rhs = self.binary(level + 1)?;
                    lhs = Expr::Binary(*op, Box::new(lhs), Box::new(rhs));
                    continue 'outer;
                }
            }
            return Ok(lhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, PluralRuleError> {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(b"!") && !self.input[self.pos..].starts_with(b"!=") {
            self.pos += 1;
            let inner = self.unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, PluralRuleError> {
        self.skip_whitespace();
        match self.input.get(self.pos) {
            Some(b'(') => {
                self.pos += 1;
                let inner = self.ternary()?;
                if !self.eat(")") {
                    return Err(self.error("expected ')'"));
                }
                Ok(inner)
            }
            Some(b'n') => {
                self.pos += 1;
                Ok(Expr::N)
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.input[start..self.pos])
                    .map_err(|_| self.error("invalid number"))?;
                digits
                    .parse()
                    .map(Expr::Const)
                    .map_err(|_| self.error("number out of range"))
            }
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}
