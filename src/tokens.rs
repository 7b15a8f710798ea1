use std::collections::HashMap;

use tracing::trace;

/// The value attached to a flag token on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The flag was given without a value.
    Present,
    Value(String),
}

/// Flag tokens, as typed (`-v`, `--verbose`), mapped to their raw values.
pub type RawFlags = HashMap<String, RawValue>;

/// Result of splitting raw arguments into flags and positionals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub flags: RawFlags,
    /// Tokens preceding the first flag.
    pub positionals: Vec<String>,
    /// Non-flag tokens after the first flag that no flag took as its value.
    pub stray: Vec<String>,
}

/// Splits `args` into a raw flag map and the leading positionals.
///
/// Positionals are only collected until the first flag token. After that every
/// non-flag token is either the value of the preceding flag or stray.
pub fn transform<I>(args: I) -> Transformed
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut p = Tokens::new(args.into_iter().map(Into::into).collect());
    let mut res = Transformed::default();
    let mut seen_flag = false;

    while let Some(arg) = p.next() {
        if !is_flag(&arg) {
            if seen_flag {
                res.stray.push(arg);
            } else {
                res.positionals.push(arg);
            }
            continue;
        }
        seen_flag = true;

        let (flag, value) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), RawValue::Value(value.to_string())),
            None => {
                let value = match p.next_value() {
                    Some(value) => RawValue::Value(value),
                    None => RawValue::Present,
                };
                (arg, value)
            }
        };
        trace!(flag = %flag, value = ?value, "flag token");
        res.flags.insert(flag, value);
    }
    res
}

/// Whether `arg` reads as a flag rather than a value.
///
/// Negative numbers (`-5`, `-0.5`) and a lone `-` or `--` are values.
pub(crate) fn is_flag(arg: &str) -> bool {
    if !arg.starts_with('-') || arg == "-" || arg == "--" {
        return false;
    }
    let name = arg.split_once('=').map_or(arg, |(flag, _)| flag);
    let name = name.trim_start_matches('-');
    !name.is_empty() && !looks_numeric(name)
}

pub(crate) fn looks_numeric(s: &str) -> bool {
    let leading_digit = s.bytes().next().map_or(false, |it| it.is_ascii_digit() || it == b'.');
    leading_digit && s.parse::<f64>().is_ok()
}

struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    fn new(mut args: Vec<String>) -> Tokens {
        args.reverse();
        Tokens { rargs: args }
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn peek_flag(&self) -> bool {
        self.rargs.last().map_or(false, |it| is_flag(it))
    }

    fn next_value(&mut self) -> Option<String> {
        if self.peek_flag() {
            return None;
        }
        self.next()
    }
}
