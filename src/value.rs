use std::{cmp::Ordering, fmt};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The type an option's value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Str,
    Number,
    Bool,
    Date,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Str => "string",
            Kind::Number => "number",
            Kind::Bool => "boolean",
            Kind::Date => "date",
        };
        f.write_str(name)
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl FlagValue {
    pub fn kind(&self) -> Kind {
        match self {
            FlagValue::Str(_) => Kind::Str,
            FlagValue::Number(_) => Kind::Number,
            FlagValue::Bool(_) => Kind::Bool,
            FlagValue::Date(_) => Kind::Date,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Str(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            FlagValue::Number(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            FlagValue::Bool(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match *self {
            FlagValue::Date(it) => Some(it),
            _ => None,
        }
    }

    /// Orders values of the same kind; values of different kinds compare by
    /// their rendering.
    pub(crate) fn sort_cmp(&self, other: &FlagValue) -> Ordering {
        match (self, other) {
            (FlagValue::Number(a), FlagValue::Number(b)) => a.total_cmp(b),
            (FlagValue::Date(a), FlagValue::Date(b)) => a.cmp(b),
            (FlagValue::Bool(a), FlagValue::Bool(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Str(it) => f.write_str(it),
            FlagValue::Number(it) => write!(f, "{it}"),
            FlagValue::Bool(it) => write!(f, "{it}"),
            FlagValue::Date(it) => f.write_str(&it.to_rfc3339()),
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> FlagValue {
        FlagValue::Str(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> FlagValue {
        FlagValue::Str(value)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> FlagValue {
        FlagValue::Bool(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> FlagValue {
        FlagValue::Number(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> FlagValue {
        FlagValue::Number(value.into())
    }
}

impl From<u32> for FlagValue {
    fn from(value: u32) -> FlagValue {
        FlagValue::Number(value.into())
    }
}

impl From<DateTime<Utc>> for FlagValue {
    fn from(value: DateTime<Utc>) -> FlagValue {
        FlagValue::Date(value)
    }
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|it| it.is_finite())
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, a plain `YYYY-MM-DD` (all
/// naive forms are read as UTC) and integer milliseconds since the epoch.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(it) = DateTime::parse_from_rfc3339(raw) {
        return Some(it.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(it) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&it));
        }
    }
    if let Ok(it) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return it.and_hms_opt(0, 0, 0).map(|it| Utc.from_utc_datetime(&it));
    }
    let millis = raw.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
