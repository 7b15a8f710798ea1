use std::sync::{Arc, Mutex};

use dflags::{Cli, Command, Flags, Opt, Parser};
use expect_test::expect;

use crate::check;

fn fs() -> Parser<String> {
    Cli::returning("fs")
        .option(Opt::new("force", false).short('f'))
        .command(Command::new("copy", ["src", "dest"], |flags: &Flags, args: &[String]| {
            format!("copy {} -> {} force={:?}", args[0], args[1], flags.bool("force"))
        }))
        .command(Command::new("rm", ">=1", |_: &Flags, args: &[String]| {
            format!("rm {}", args.join(" "))
        }))
        .command(Command::new("exec", "all", |_: &Flags, args: &[String]| {
            format!("exec {args:?}")
        }))
        .default_handler(|_: &Flags, args: &[String]| format!("default {args:?}"))
        .build()
        .unwrap()
}

#[test]
fn subcommands() {
    let parser = fs();
    let parsed = parser.parse(["copy", "a", "b", "-f"]).unwrap();
    assert_eq!(parsed.command.as_deref(), Some("copy"));
    assert_eq!(parsed.call().unwrap(), "copy a -> b force=Some(true)");

    let parsed = parser.parse(["rm", "x", "y"]).unwrap();
    assert_eq!(parsed.call().unwrap(), "rm x y");

    let parsed = parser.parse(["exec"]).unwrap();
    assert_eq!(parsed.call().unwrap(), "exec []");

    let parsed = parser.parse(["unknown", "1"]).unwrap();
    assert_eq!(parsed.command, None);
    assert_eq!(parsed.call().unwrap(), r#"default ["unknown", "1"]"#);
}

#[test]
fn subcommand_arity() {
    check(&fs(), "copy a", expect![[r#"copy expects 2 arguments, got 1"#]]);
    check(&fs(), "copy a b c", expect![[r#"copy expects 2 arguments, got 3"#]]);
    check(
        &fs(),
        "rm",
        expect![[
            r#"Invalid usage of command 'rm'. Too few arguments (expected at least 1, got 0)"#
        ]],
    );
    check(
        &fs(),
        "copy a b --force",
        expect![[r#"
            Parsed {
                flags: {
                    "force": Bool(
                        true,
                    ),
                },
                command: Some(
                    "copy",
                ),
                args: [
                    "a",
                    "b",
                ],
                positionals: [
                    "copy",
                    "a",
                    "b",
                ],
                warnings: [],
                ..
            }
        "#]],
    );
}

#[test]
fn standalone_positionals() {
    let parser = Cli::new("cat").positionals(">=1").build().unwrap();
    check(
        &parser,
        "",
        expect![[r#"Invalid usage. Too few arguments (expected at least 1, got 0)"#]],
    );
    let parsed = parser.parse(["x"]).unwrap();
    assert_eq!(parsed.positionals, vec!["x".to_string()]);
    assert_eq!(parsed.call(), None);
}

#[test]
fn flags_are_collected_before_commands_are_matched() {
    let parser = Cli::new("x")
        .option(Opt::new("count", 0))
        .command(Command::new("copy", ["src", "dest"], |_, _| ()))
        .build()
        .unwrap();
    check(&parser, "copy a --count=z", expect![[r#"--count expects a number, got "z""#]]);
}

#[test]
fn error_handler_takes_over() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let parser = {
        let seen = seen.clone();
        Cli::returning("fs")
            .command(Command::new("copy", ["src", "dest"], |_, _| 1))
            .default_handler(|_, _| 2)
            .error_handler(move |err, usage| {
                seen.lock().unwrap().push((err.to_string(), usage.starts_with("fs\n")));
            })
            .build()
            .unwrap()
    };

    let parsed = parser.parse(["copy", "a"]).unwrap();
    assert_eq!(parsed.call(), None);
    let err = parsed.error().map(ToString::to_string);
    assert_eq!(err.as_deref(), Some("copy expects 2 arguments, got 1"));
    let expected = vec![("copy expects 2 arguments, got 1".to_string(), true)];
    assert_eq!(*seen.lock().unwrap(), expected);

    let parsed = parser.parse(["copy", "a", "b"]).unwrap();
    assert_eq!(parsed.call(), Some(1));
    assert_eq!(parsed.error(), None);
    let parsed = parser.parse(Vec::<String>::new()).unwrap();
    assert_eq!(parsed.call(), Some(2));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn no_handler_is_a_no_op() {
    let parser = Cli::new("x").option(Opt::new("n", 1)).build().unwrap();
    let parsed = parser.parse(["a", "b"]).unwrap();
    assert_eq!(parsed.call(), None);
    assert_eq!(parsed.args, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn warning_callback() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let parser = {
        let seen = seen.clone();
        Cli::new("x")
            .option(Opt::new("n", 1))
            .on_warning(move |w| seen.lock().unwrap().push(w.to_string()))
            .build()
            .unwrap()
    };
    parser.parse(["--n", "2", "--m", "--o=1", "stray"]).unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "Unknown flag: `--m`".to_string(),
            "Unknown flag: `--o`".to_string(),
            "Unexpected argument: `stray`".to_string(),
        ]
    );
}
