//! `dflags` parses command line arguments against a schema of typed defaults.
//!
//! Every configuration key is declared with an [`Opt`]: its default value
//! fixes the expected [`Kind`], and the option may carry a short alias,
//! an allowed-value set and a custom validator. Subcommands are matched on the
//! first positional token and dispatch to their handler.
//!
//! ```
//! use dflags::{Cli, Opt};
//!
//! let parser = Cli::new("greet")
//!     .option(Opt::new("name", ""))
//!     .option(Opt::new("hasDog", false).short('d'))
//!     .build()
//!     .unwrap();
//!
//! let parsed = parser.parse(["--name", "Ann", "-d"]).unwrap();
//! assert_eq!(parsed.flags.str("name"), Some("Ann"));
//! assert_eq!(parsed.flags.bool("hasDog"), Some(true));
//! ```
use std::fmt;

mod collect;
mod command;
mod config_file;
mod count;
mod help;
mod parser;
mod registry;
mod tokens;
mod value;

pub use crate::{
    collect::{Flags, Warning},
    command::{ArgPattern, Command, IntoArgPattern},
    count::CountExpr,
    parser::{Cli, Parsed, Parser},
    registry::Opt,
    tokens::{transform, RawFlags, RawValue, Transformed},
    value::{FlagValue, Kind},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The parser was declared inconsistently.
///
/// Reported by [`Cli::build`], before any arguments are looked at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Option `{0}` is declared more than once")]
    DuplicateKey(String),
    #[error("Flag `{token}` of `{key}` is already used by `{owner}`")]
    AliasCollision { token: String, key: String, owner: String },
    #[error("Command `{0}` is declared more than once")]
    DuplicateCommand(String),
    #[error("Invalid count expression `{0}`, expected one of `*`, `=N`, `>=N`, `<=N`")]
    InvalidCount(String),
    #[error("Invalid option `{key}`: {msg}")]
    InvalidOption { key: String, msg: String },
}

/// The arguments do not satisfy the declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    msg: String,
}

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> ValidationError {
        ValidationError { msg: msg.into() }
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

impl std::error::Error for ValidationError {}

macro_rules! format_err {
    ($($tt:tt)*) => {
        $crate::ValidationError::new(format!($($tt)*))
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err($crate::format_err!($($tt)*))
    };
}

pub(crate) use bail;
pub(crate) use format_err;
