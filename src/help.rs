use std::fmt::Write;

use crate::{command::Matcher, registry::Registry, FlagValue, Kind};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn render<T>(
    name: &str,
    about: Option<&str>,
    registry: &Registry,
    matcher: &Matcher<T>,
) -> String {
    let mut buf = String::new();
    w!(buf, "{name}\n");
    if let Some(about) = about {
        w!(buf, "  {about}\n");
    }

    blank_line(&mut buf);
    w!(buf, "USAGE:\n");
    w!(buf, "    {name}");
    if !matcher.commands().is_empty() {
        w!(buf, " [COMMAND]");
    } else if let Some(expr) = matcher.positionals() {
        w!(buf, " <{expr} ARGS>");
    }
    if registry.values().next().is_some() {
        w!(buf, " [OPTIONS]");
    }
    w!(buf, "\n");

    if !matcher.commands().is_empty() {
        blank_line(&mut buf);
        w!(buf, "COMMANDS:\n");

        let mut blank = "";
        for cmd in matcher.commands() {
            w!(buf, "{blank}");
            blank = "\n";

            w!(buf, "    {}", cmd.name());
            let args = cmd.pattern().to_string();
            if !args.is_empty() {
                w!(buf, " {args}");
            }
            w!(buf, "\n");
            if let Some(doc) = cmd.description() {
                w!(buf, "      {doc}\n");
            }
        }
    }

    if registry.values().next().is_some() {
        blank_line(&mut buf);
        w!(buf, "OPTIONS:\n");

        let mut blank = "";
        for opt in registry.values() {
            w!(buf, "{blank}");
            blank = "\n";

            let tokens = registry.tokens(opt);
            let mut flags = tokens.into_iter().map(|(token, _)| token).collect::<Vec<_>>();
            // Short flag first, the way it is usually typed.
            flags.rotate_right(usize::from(opt.short_flag().is_some()));
            w!(buf, "    {}", flags.join(", "));
            if opt.kind() != Kind::Bool {
                w!(buf, " <{}>", opt.kind());
            }
            w!(buf, "\n");

            let mut notes = Vec::new();
            match opt.default_value() {
                None => notes.push("required".to_string()),
                Some(FlagValue::Str(it)) if it.is_empty() => (),
                Some(default) => notes.push(format!("default: {default}")),
            }
            if let Some(allowed) = opt.allowed() {
                let allowed = allowed.iter().map(ToString::to_string).collect::<Vec<_>>();
                notes.push(format!("one of: {}", allowed.join(", ")));
            }
            let notes =
                if notes.is_empty() { String::new() } else { format!("({})", notes.join("; ")) };
            match (opt.description(), notes.is_empty()) {
                (Some(doc), true) => w!(buf, "      {doc}\n"),
                (Some(doc), false) => w!(buf, "      {doc} {notes}\n"),
                (None, false) => w!(buf, "      {notes}\n"),
                (None, true) => (),
            }
        }
    }

    buf
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
