use std::{collections::HashMap, fmt, sync::Arc};

use crate::{tokens::looks_numeric, ConfigError, FlagValue, Kind};

type Check = dyn Fn(&FlagValue) -> bool + Send + Sync;
type Message = dyn Fn(&FlagValue) -> String + Send + Sync;

#[derive(Clone)]
pub(crate) struct Validator {
    check: Arc<Check>,
    message: Arc<Message>,
}

impl Validator {
    /// Returns the rejection message if `value` fails the check.
    pub(crate) fn reject(&self, value: &FlagValue) -> Option<String> {
        if (self.check)(value) {
            None
        } else {
            Some((self.message)(value))
        }
    }
}

/// Declaration of a single configuration key.
///
/// The long flag defaults to `--<key>`.
#[derive(Clone)]
pub struct Opt {
    key: String,
    long: String,
    short: Option<char>,
    kind: Kind,
    default: Option<FlagValue>,
    one_of: Option<Vec<FlagValue>>,
    validator: Option<Validator>,
    description: Option<String>,
}

impl Opt {
    /// An optional key; `default` fixes the expected kind.
    pub fn new(key: &str, default: impl Into<FlagValue>) -> Opt {
        let default = default.into();
        Opt::with_default(key, default.kind(), Some(default))
    }

    /// A key that must be supplied on every parse.
    pub fn required(key: &str, kind: Kind) -> Opt {
        Opt::with_default(key, kind, None)
    }

    fn with_default(key: &str, kind: Kind, default: Option<FlagValue>) -> Opt {
        Opt {
            key: key.to_string(),
            long: key.to_string(),
            short: None,
            kind,
            default,
            one_of: None,
            validator: None,
            description: None,
        }
    }

    pub fn long(mut self, long: &str) -> Opt {
        self.long = long.trim_start_matches('-').to_string();
        self
    }

    pub fn short(mut self, short: char) -> Opt {
        self.short = Some(short);
        self
    }

    /// Restricts values to `allowed`. Optional keys also accept their default.
    pub fn one_of<I>(mut self, allowed: I) -> Opt
    where
        I: IntoIterator,
        I::Item: Into<FlagValue>,
    {
        self.one_of = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Runs `check` on every supplied value; `message` explains a rejection.
    pub fn validate<C, M>(mut self, check: C, message: M) -> Opt
    where
        C: Fn(&FlagValue) -> bool + Send + Sync + 'static,
        M: Fn(&FlagValue) -> String + Send + Sync + 'static,
    {
        self.validator = Some(Validator { check: Arc::new(check), message: Arc::new(message) });
        self
    }

    pub fn describe(mut self, description: &str) -> Opt {
        self.description = Some(description.to_string());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn default_value(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn short_flag(&self) -> Option<String> {
        self.short.map(|it| format!("-{it}"))
    }

    pub fn long_flag(&self) -> String {
        format!("--{}", self.long)
    }

    pub(crate) fn allowed(&self) -> Option<&[FlagValue]> {
        self.one_of.as_deref()
    }

    pub(crate) fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    fn check_shape(&self) -> Result<(), ConfigError> {
        let err = |msg: &str| {
            Err(ConfigError::InvalidOption { key: self.key.clone(), msg: msg.to_string() })
        };
        if self.key.is_empty() {
            return err("key can't be empty");
        }
        if self.long.is_empty() || self.long.contains(|c: char| c == '=' || c.is_whitespace()) {
            return err("long flag must be a non-empty word without `=`");
        }
        if looks_numeric(&self.long) {
            return err("long flag can't be a number");
        }
        if let Some(short) = self.short {
            if short == '-' || short == '=' || short.is_whitespace() || short.is_ascii_digit() {
                return err("short flag can't be a digit, `-`, `=` or whitespace");
            }
        }
        if let Some(allowed) = &self.one_of {
            if allowed.iter().any(|it| it.kind() != self.kind) {
                return err("allowed values must match the option's kind");
            }
            if !matches!(self.kind, Kind::Str | Kind::Number) {
                return err("allowed values are only supported for strings and numbers");
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opt")
            .field("key", &self.key)
            .field("long", &self.long)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("one_of", &self.one_of)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// How a flag token refers to its key. Lookup tries them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum AliasKind {
    Long,
    Kebab,
    Short,
}

#[derive(Debug, Clone)]
pub(crate) struct Alias {
    pub(crate) key: String,
    pub(crate) kind: AliasKind,
}

/// Declared options and the flag tokens resolving to them.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    opts: Vec<Opt>,
    aliases: HashMap<String, Alias>,
    decamelize: bool,
}

impl Registry {
    pub(crate) fn new(decamelize: bool) -> Registry {
        Registry { decamelize, ..Registry::default() }
    }

    pub(crate) fn register(&mut self, opt: Opt) -> Result<(), ConfigError> {
        opt.check_shape()?;
        if self.get(&opt.key).is_some() {
            return Err(ConfigError::DuplicateKey(opt.key));
        }

        let tokens = self.tokens(&opt);
        for (token, _) in &tokens {
            if let Some(owner) = self.aliases.get(token) {
                return Err(ConfigError::AliasCollision {
                    token: token.clone(),
                    key: opt.key.clone(),
                    owner: owner.key.clone(),
                });
            }
        }
        for (token, kind) in tokens {
            self.aliases.insert(token, Alias { key: opt.key.clone(), kind });
        }
        self.opts.push(opt);
        Ok(())
    }

    pub(crate) fn resolve(&self, token: &str) -> Option<&Alias> {
        self.aliases.get(token)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Opt> {
        self.opts.iter().find(|it| it.key == key)
    }

    /// Options in registration order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &Opt> {
        self.opts.iter()
    }

    /// Flag tokens of `opt`, most preferred first.
    pub(crate) fn tokens(&self, opt: &Opt) -> Vec<(String, AliasKind)> {
        let mut res = vec![(opt.long_flag(), AliasKind::Long)];
        let kebab = kebab(&opt.key);
        if self.decamelize && kebab != opt.key && kebab != opt.long {
            res.push((format!("--{kebab}"), AliasKind::Kebab));
        }
        if let Some(short) = opt.short_flag() {
            res.push((short, AliasKind::Short));
        }
        res
    }
}

/// `hasDog` -> `has-dog`.
pub(crate) fn kebab(s: &str) -> String {
    let mut res = String::with_capacity(s.len() + 2);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            res.push('-');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        res.push(c.to_ascii_lowercase());
    }
    res
}
