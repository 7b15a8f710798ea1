use std::fmt;

use tracing::debug;

use crate::{bail, ConfigError, CountExpr, Flags, ValidationError};

pub(crate) type Handler<T> = Box<dyn Fn(&Flags, &[String]) -> T + Send + Sync>;

/// What a subcommand accepts after its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPattern {
    /// Exactly these arguments, by name.
    Names(Vec<String>),
    /// Anything.
    All,
    Count(CountExpr),
}

impl ArgPattern {
    fn check(&self, command: &str, args: &[String]) -> Result<(), ValidationError> {
        match self {
            ArgPattern::All => (),
            ArgPattern::Names(names) => {
                if names.len() != args.len() {
                    let noun = if names.len() == 1 { "argument" } else { "arguments" };
                    bail!("{command} expects {} {noun}, got {}", names.len(), args.len())
                }
            }
            ArgPattern::Count(expr) => {
                if let Some(violation) = expr.violation(args.len()) {
                    bail!(
                        "Invalid usage of command '{command}'. {violation} arguments (expected {expr}, got {})",
                        args.len()
                    )
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ArgPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPattern::Names(names) => {
                let mut sep = "";
                for name in names {
                    write!(f, "{sep}<{name}>")?;
                    sep = " ";
                }
                Ok(())
            }
            ArgPattern::All | ArgPattern::Count(CountExpr::Any) => f.write_str("[ARGS]..."),
            ArgPattern::Count(expr) => write!(f, "<{expr} ARGS>"),
        }
    }
}

/// Conversion into an [`ArgPattern`]; strings are `all` or a count expression.
pub trait IntoArgPattern {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError>;
}

impl IntoArgPattern for ArgPattern {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError> {
        Ok(self)
    }
}

impl IntoArgPattern for CountExpr {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError> {
        Ok(ArgPattern::Count(self))
    }
}

impl IntoArgPattern for &str {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError> {
        if self == "all" {
            return Ok(ArgPattern::All);
        }
        self.parse().map(ArgPattern::Count)
    }
}

impl<const N: usize> IntoArgPattern for [&str; N] {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError> {
        Ok(ArgPattern::Names(self.iter().map(|it| it.to_string()).collect()))
    }
}

impl IntoArgPattern for Vec<String> {
    fn into_arg_pattern(self) -> Result<ArgPattern, ConfigError> {
        Ok(ArgPattern::Names(self))
    }
}

/// A subcommand: its name, argument rule and handler.
pub struct Command<T> {
    name: String,
    pattern: ArgPattern,
    invalid: Option<ConfigError>,
    description: Option<String>,
    pub(crate) handler: Handler<T>,
}

impl<T> Command<T> {
    pub fn new<P, F>(name: &str, pattern: P, handler: F) -> Command<T>
    where
        P: IntoArgPattern,
        F: Fn(&Flags, &[String]) -> T + Send + Sync + 'static,
    {
        let (pattern, invalid) = match pattern.into_arg_pattern() {
            Ok(pattern) => (pattern, None),
            Err(err) => (ArgPattern::All, Some(err)),
        };
        Command {
            name: name.to_string(),
            pattern,
            invalid,
            description: None,
            handler: Box::new(handler),
        }
    }

    pub fn describe(mut self, description: &str) -> Command<T> {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn pattern(&self) -> &ArgPattern {
        &self.pattern
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Outcome of matching positionals against the declared commands.
pub(crate) struct Matched<'a, T> {
    pub(crate) command: Option<&'a Command<T>>,
    /// Arguments following the command name; empty when nothing matched.
    pub(crate) args: Vec<String>,
    pub(crate) positionals: Vec<String>,
}

/// Subcommands plus the rule for positionals when no subcommand matches.
pub(crate) struct Matcher<T> {
    commands: Vec<Command<T>>,
    positionals: Option<CountExpr>,
}

impl<T> Default for Matcher<T> {
    fn default() -> Matcher<T> {
        Matcher { commands: Vec::new(), positionals: None }
    }
}

impl<T> Matcher<T> {
    pub(crate) fn register(&mut self, command: Command<T>) -> Result<(), ConfigError> {
        if let Some(err) = &command.invalid {
            return Err(err.clone());
        }
        if command.name.is_empty() || command.name.starts_with('-') {
            return Err(ConfigError::InvalidOption {
                key: command.name,
                msg: "command name can't be empty or begin with `-`".to_string(),
            });
        }
        if self.get(&command.name).is_some() {
            return Err(ConfigError::DuplicateCommand(command.name));
        }
        self.commands.push(command);
        Ok(())
    }

    pub(crate) fn set_positionals(&mut self, expr: CountExpr) {
        self.positionals = Some(expr);
    }

    pub(crate) fn positionals(&self) -> Option<CountExpr> {
        self.positionals
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Command<T>> {
        self.commands.iter().find(|it| it.name == name)
    }

    pub(crate) fn commands(&self) -> &[Command<T>] {
        &self.commands
    }

    pub(crate) fn matches(
        &self,
        positionals: Vec<String>,
    ) -> Result<Matched<'_, T>, ValidationError> {
        if let Some(command) = positionals.first().and_then(|it| self.get(it)) {
            let args = positionals[1..].to_vec();
            command.pattern.check(&command.name, &args)?;
            debug!(command = %command.name, args = args.len(), "matched command");
            return Ok(Matched { command: Some(command), args, positionals });
        }

        if let Some(expr) = self.positionals {
            if let Some(violation) = expr.violation(positionals.len()) {
                bail!(
                    "Invalid usage. {violation} arguments (expected {expr}, got {})",
                    positionals.len()
                )
            }
        }
        Ok(Matched { command: None, args: Vec::new(), positionals })
    }
}
