use std::{fmt, str::FromStr};

use crate::ConfigError;

/// An arity rule for positional arguments: `*`, `=N`, `>=N` or `<=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountExpr {
    Any,
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl CountExpr {
    pub fn matches(self, count: usize) -> bool {
        match self {
            CountExpr::Any => true,
            CountExpr::Exactly(n) => count == n,
            CountExpr::AtLeast(n) => count >= n,
            CountExpr::AtMost(n) => count <= n,
        }
    }

    /// Names the violated bound: `Some("Too few")` or `Some("Too many")`.
    pub(crate) fn violation(self, count: usize) -> Option<&'static str> {
        if self.matches(count) {
            return None;
        }
        let too_few = match self {
            CountExpr::Any => return None,
            CountExpr::Exactly(n) | CountExpr::AtLeast(n) | CountExpr::AtMost(n) => count < n,
        };
        Some(if too_few { "Too few" } else { "Too many" })
    }
}

impl FromStr for CountExpr {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<CountExpr, ConfigError> {
        let err = || ConfigError::InvalidCount(s.to_string());
        let expr = s.trim();
        if expr == "*" {
            return Ok(CountExpr::Any);
        }
        let (ctor, n): (fn(usize) -> CountExpr, &str) = if let Some(n) = expr.strip_prefix(">=") {
            (CountExpr::AtLeast, n)
        } else if let Some(n) = expr.strip_prefix("<=") {
            (CountExpr::AtMost, n)
        } else if let Some(n) = expr.strip_prefix('=') {
            (CountExpr::Exactly, n)
        } else {
            return Err(err());
        };
        if n.is_empty() || !n.bytes().all(|it| it.is_ascii_digit()) {
            return Err(err());
        }
        n.parse().map(ctor).map_err(|_| err())
    }
}

impl fmt::Display for CountExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountExpr::Any => f.write_str("any number"),
            CountExpr::Exactly(n) => write!(f, "exactly {n}"),
            CountExpr::AtLeast(n) => write!(f, "at least {n}"),
            CountExpr::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}
