use dflags::{Cli, Command, Kind, Opt};
use expect_test::expect;

#[test]
fn help() {
    let parser = Cli::new("fs")
        .about("File tools")
        .option(Opt::new("force", false).short('f').describe("Overwrite existing files"))
        .option(Opt::new("env", "dev").one_of(["dev", "prod"]))
        .option(Opt::required("user", Kind::Str))
        .option(Opt::new("name", ""))
        .command(Command::new("copy", ["src", "dest"], |_, _| ()).describe("Copy a file"))
        .command(Command::new("rm", ">=1", |_, _| ()))
        .command(Command::new("exec", "all", |_, _| ()))
        .build()
        .unwrap();

    expect![[r#"
        fs
          File tools

        USAGE:
            fs [COMMAND] [OPTIONS]

        COMMANDS:
            copy <src> <dest>
              Copy a file

            rm <at least 1 ARGS>

            exec [ARGS]...

        OPTIONS:
            -f, --force
              Overwrite existing files (default: false)

            --env <string>
              (default: dev; one of: dev, prod)

            --user <string>
              (required)

            --name <string>
    "#]]
    .assert_eq(&parser.help());
}

#[test]
fn help_with_positionals_and_decamelized_flags() {
    let parser = Cli::new("cat")
        .decamelize(true)
        .positionals(">=1")
        .option(Opt::new("lineNumbers", false).short('n').describe("Number the output lines"))
        .option(Opt::new("tabWidth", 8))
        .build()
        .unwrap();

    expect![[r#"
        cat

        USAGE:
            cat <at least 1 ARGS> [OPTIONS]

        OPTIONS:
            -n, --lineNumbers, --line-numbers
              Number the output lines (default: false)

            --tabWidth, --tab-width <number>
              (default: 8)
    "#]]
    .assert_eq(&parser.help());
}
