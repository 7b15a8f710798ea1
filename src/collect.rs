use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    bail, format_err,
    registry::{AliasKind, Opt, Registry},
    value, FlagValue, Kind, RawFlags, RawValue, ValidationError,
};

/// Collected option values, keyed by configuration key.
///
/// Holds exactly one value per declared option.
#[derive(Clone, Default, PartialEq)]
pub struct Flags {
    values: BTreeMap<String, FlagValue>,
}

impl Flags {
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FlagValue::as_str)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FlagValue::as_number)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FlagValue::as_bool)
    }

    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key).and_then(FlagValue::as_date)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

/// Something in the input that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A flag token no option answers to.
    UnknownFlag(String),
    /// A non-flag token after the first flag that no flag took as its value.
    StrayArgument(String),
    /// A config file key that is not a declared option.
    UnknownConfigKey(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownFlag(it) => write!(f, "Unknown flag: `{it}`"),
            Warning::StrayArgument(it) => write!(f, "Unexpected argument: `{it}`"),
            Warning::UnknownConfigKey(it) => write!(f, "Unknown config key: `{it}`"),
        }
    }
}

pub(crate) struct Collected {
    pub(crate) flags: Flags,
    /// Flag tokens that did not resolve to any option, sorted.
    pub(crate) unknown: Vec<String>,
}

/// Reconciles raw flags with the declared options, failing on the first
/// violation.
pub(crate) fn collect(raw: &RawFlags, registry: &Registry) -> Result<Collected, ValidationError> {
    // Per key, the supplied token with the most preferred alias kind.
    let mut supplied: HashMap<&str, (AliasKind, &str, &RawValue)> = HashMap::new();
    let mut unknown = Vec::new();
    for (token, value) in raw {
        let Some(alias) = registry.resolve(token) else {
            unknown.push(token.clone());
            continue;
        };
        let candidate = (alias.kind, token.as_str(), value);
        let entry = supplied.entry(alias.key.as_str()).or_insert(candidate);
        if candidate.0 < entry.0 {
            *entry = candidate;
        }
    }
    unknown.sort();

    let mut flags = Flags::default();
    for opt in registry.values() {
        let value = match supplied.get(opt.key()) {
            Some(&(_, flag, value)) => coerce(opt, flag, value)?,
            None => match opt.default_value() {
                Some(default) => default.clone(),
                None => bail!("Missing required option {}", opt.long_flag()),
            },
        };
        flags.values.insert(opt.key().to_string(), value);
    }
    debug!(collected = flags.len(), unknown = unknown.len(), "collected flags");
    Ok(Collected { flags, unknown })
}

fn coerce(opt: &Opt, flag: &str, raw: &RawValue) -> Result<FlagValue, ValidationError> {
    let text = match raw {
        RawValue::Value(it) => it.as_str(),
        RawValue::Present if opt.kind() == Kind::Bool => return Ok(FlagValue::Bool(true)),
        RawValue::Present => bail!("{flag} expects an argument"),
    };

    let value = match opt.kind() {
        Kind::Str => FlagValue::Str(text.to_string()),
        Kind::Bool => match value::parse_bool(text) {
            Some(it) => FlagValue::Bool(it),
            None => bail!("{flag} expects a boolean, got \"{text}\""),
        },
        Kind::Number => match value::parse_number(text) {
            Some(it) => FlagValue::Number(it),
            None => bail!("{flag} expects a number, got \"{text}\""),
        },
        Kind::Date => match value::parse_date(text) {
            Some(it) => FlagValue::Date(it),
            None => bail!("{flag} expects a date, got \"{text}\""),
        },
    };

    if let Some(allowed) = opt.allowed() {
        // Optional keys always accept their own default.
        if !allowed.contains(&value) && opt.default_value() != Some(&value) {
            let mut allowed = allowed.to_vec();
            allowed.sort_by(FlagValue::sort_cmp);
            let allowed = allowed.iter().map(ToString::to_string).collect::<Vec<_>>();
            return Err(format_err!(
                "Invalid value for {flag}: \"{text}\". Expected one of: {}",
                allowed.join(", ")
            ));
        }
    }

    if let Some(msg) = opt.validator().and_then(|it| it.reject(&value)) {
        return Err(ValidationError::new(msg));
    }
    Ok(value)
}
