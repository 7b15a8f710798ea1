use std::{ffi::OsString, fmt, path::Path};

use tracing::debug;

use crate::{
    collect::collect,
    command::{Command, Handler, Matcher},
    config_file, format_err, help,
    registry::{Opt, Registry},
    tokens::{transform, Transformed},
    ConfigError, CountExpr, Flags, Kind, RawFlags, RawValue, ValidationError, Warning,
};

type ErrorHandler = Box<dyn Fn(&ValidationError, &str) + Send + Sync>;
type WarningHandler = Box<dyn Fn(&Warning) + Send + Sync>;

/// Builder for a [`Parser`].
///
/// Declaration mistakes do not surface until [`Cli::build`], which reports the
/// first one.
pub struct Cli<T = ()> {
    name: String,
    about: Option<String>,
    decamelize: bool,
    opts: Vec<Opt>,
    config_key: Option<String>,
    commands: Vec<Command<T>>,
    positionals: Option<Result<CountExpr, ConfigError>>,
    default_handler: Option<Handler<T>>,
    error_handler: Option<ErrorHandler>,
    warning_handler: Option<WarningHandler>,
}

impl Cli {
    pub fn new(name: &str) -> Cli {
        Cli::returning(name)
    }
}

impl<T> Cli<T> {
    /// A builder whose handlers return `T`.
    pub fn returning(name: &str) -> Cli<T> {
        Cli {
            name: name.to_string(),
            about: None,
            decamelize: false,
            opts: Vec::new(),
            config_key: None,
            commands: Vec::new(),
            positionals: None,
            default_handler: None,
            error_handler: None,
            warning_handler: None,
        }
    }

    pub fn about(mut self, about: &str) -> Cli<T> {
        self.about = Some(about.to_string());
        self
    }

    /// Also accept `--kebab-case` for camelCase keys.
    pub fn decamelize(mut self, yes: bool) -> Cli<T> {
        self.decamelize = yes;
        self
    }

    pub fn option(mut self, opt: Opt) -> Cli<T> {
        self.opts.push(opt);
        self
    }

    /// Declares a string option naming a JSON file whose keys fill in options
    /// missing from the command line.
    pub fn config_file(mut self, opt: Opt) -> Cli<T> {
        self.config_key = Some(opt.key().to_string());
        self.opts.push(opt);
        self
    }

    pub fn command(mut self, command: Command<T>) -> Cli<T> {
        self.commands.push(command);
        self
    }

    /// Arity rule for positionals when no subcommand matches, e.g. `">=1"`.
    pub fn positionals(mut self, expr: &str) -> Cli<T> {
        self.positionals = Some(expr.parse());
        self
    }

    /// Handler for when no subcommand matches; receives the positionals.
    pub fn default_handler<F>(mut self, handler: F) -> Cli<T>
    where
        F: Fn(&Flags, &[String]) -> T + Send + Sync + 'static,
    {
        self.default_handler = Some(Box::new(handler));
        self
    }

    /// Receives validation errors together with the usage text instead of
    /// `parse` returning them.
    pub fn error_handler<F>(mut self, handler: F) -> Cli<T>
    where
        F: Fn(&ValidationError, &str) + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    pub fn on_warning<F>(mut self, handler: F) -> Cli<T>
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.warning_handler = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<Parser<T>, ConfigError> {
        let mut registry = Registry::new(self.decamelize);
        for opt in self.opts {
            registry.register(opt)?;
        }
        if let Some(key) = &self.config_key {
            if registry.get(key).map(Opt::kind) != Some(Kind::Str) {
                return Err(ConfigError::InvalidOption {
                    key: key.clone(),
                    msg: "config file option must be a string".to_string(),
                });
            }
        }

        let mut matcher = Matcher::default();
        for command in self.commands {
            matcher.register(command)?;
        }
        if let Some(expr) = self.positionals {
            matcher.set_positionals(expr?);
        }

        Ok(Parser {
            name: self.name,
            about: self.about,
            registry,
            matcher,
            config_key: self.config_key,
            default_handler: self.default_handler,
            error_handler: self.error_handler,
            warning_handler: self.warning_handler,
        })
    }
}

/// A validated declaration, reusable across any number of parses.
pub struct Parser<T = ()> {
    name: String,
    about: Option<String>,
    registry: Registry,
    matcher: Matcher<T>,
    config_key: Option<String>,
    default_handler: Option<Handler<T>>,
    error_handler: Option<ErrorHandler>,
    warning_handler: Option<WarningHandler>,
}

impl<T> Parser<T> {
    pub fn parse<I>(&self, args: I) -> Result<Parsed<'_, T>, ValidationError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.handle(self.parse_(transform(args)))
    }

    /// Parses the arguments of the current process, without the program name.
    ///
    /// Arguments that are not valid UTF-8 are a [`ValidationError`].
    pub fn parse_env(&self) -> Result<Parsed<'_, T>, ValidationError> {
        self.parse_os(std::env::args_os().skip(1))
    }

    fn parse_os<I>(&self, args: I) -> Result<Parsed<'_, T>, ValidationError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args
            .into_iter()
            .map(|it| it.into_string().map_err(|it| format_err!("invalid utf8 argument: {it:?}")))
            .collect::<Result<Vec<_>, _>>();
        self.handle(args.and_then(|args| self.parse_(transform(args))))
    }

    fn handle<'p>(
        &'p self,
        res: Result<Parsed<'p, T>, ValidationError>,
    ) -> Result<Parsed<'p, T>, ValidationError> {
        match res {
            Ok(it) => Ok(it),
            Err(err) => match &self.error_handler {
                Some(handler) => {
                    handler(&err, &self.help());
                    Ok(Parsed::failed(err))
                }
                None => Err(err),
            },
        }
    }

    pub fn help(&self) -> String {
        help::render(&self.name, self.about.as_deref(), &self.registry, &self.matcher)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse_(&self, transformed: Transformed) -> Result<Parsed<'_, T>, ValidationError> {
        let Transformed { flags: mut raw, positionals, stray } = transformed;
        debug!(flags = raw.len(), positionals = positionals.len(), "transformed arguments");

        let mut warnings = Vec::new();
        if let Some(path) = self.config_path(&raw) {
            warnings.extend(config_file::merge(Path::new(&path), &mut raw, &self.registry)?);
        }

        let collected = collect(&raw, &self.registry)?;
        let matched = self.matcher.matches(positionals)?;

        warnings.extend(collected.unknown.into_iter().map(Warning::UnknownFlag));
        warnings.extend(stray.into_iter().map(Warning::StrayArgument));
        if let Some(handler) = &self.warning_handler {
            for warning in &warnings {
                handler(warning);
            }
        }

        let res = match matched.command {
            Some(command) => Parsed {
                flags: collected.flags,
                command: Some(command.name().to_string()),
                args: matched.args,
                positionals: matched.positionals,
                warnings,
                error: None,
                target: Some(&command.handler),
            },
            None => Parsed {
                flags: collected.flags,
                command: None,
                args: matched.positionals.clone(),
                positionals: matched.positionals,
                warnings,
                error: None,
                target: self.default_handler.as_ref(),
            },
        };
        Ok(res)
    }

    fn config_path(&self, raw: &RawFlags) -> Option<String> {
        let opt = self.registry.get(self.config_key.as_deref()?)?;
        let path = self.registry.tokens(opt).into_iter().find_map(|(token, _)| raw.get(&token))?;
        match path {
            RawValue::Value(it) if !it.is_empty() => Some(it.clone()),
            _ => None,
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("name", &self.name)
            .field("options", &self.registry.values().collect::<Vec<_>>())
            .field("commands", &self.matcher.commands())
            .finish_non_exhaustive()
    }
}

/// The outcome of a single [`Parser::parse`].
pub struct Parsed<'p, T = ()> {
    pub flags: Flags,
    /// The matched subcommand, if any.
    pub command: Option<String>,
    /// What the handler receives: the subcommand's arguments, or all
    /// positionals when no subcommand matched.
    pub args: Vec<String>,
    pub positionals: Vec<String>,
    pub warnings: Vec<Warning>,
    error: Option<ValidationError>,
    target: Option<&'p Handler<T>>,
}

impl<'p, T> Parsed<'p, T> {
    fn failed(err: ValidationError) -> Parsed<'p, T> {
        Parsed {
            flags: Flags::default(),
            command: None,
            args: Vec::new(),
            positionals: Vec::new(),
            warnings: Vec::new(),
            error: Some(err),
            target: None,
        }
    }

    /// Runs the bound handler. Returns `None` if there is nothing to run.
    pub fn call(&self) -> Option<T> {
        let handler = self.target?;
        Some(handler(&self.flags, self.args.as_slice()))
    }

    /// The error already passed to the error handler.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }
}

impl<T> fmt::Debug for Parsed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsed")
            .field("flags", &self.flags)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("positionals", &self.positionals)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
