use dflags::{Cli, Command, Flags, Opt};

fn main() {
    let parser = Cli::returning("hello")
        .about("Greets people")
        .decamelize(true)
        .option(Opt::new("name", "world").describe("Who to greet"))
        .option(Opt::new("hasDog", false).short('d').describe("Greet the dog too"))
        .command(
            Command::new("twice", ["greeting"], |flags: &Flags, args: &[String]| {
                let name = flags.str("name").unwrap_or_default();
                format!("{0} {name}! {0} {name}!", args[0])
            })
            .describe("Say it twice"),
        )
        .default_handler(|flags: &Flags, _: &[String]| {
            let name = flags.str("name").unwrap_or_default();
            let dog = if flags.bool("hasDog") == Some(true) { " And hello dog!" } else { "" };
            format!("Hello {name}!{dog}")
        })
        .error_handler(|err, usage| eprintln!("{err}\n\n{usage}"))
        .build();

    let parser = match parser {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2)
        }
    };

    let parsed = match parser.parse_env() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1)
        }
    };
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }
    match parsed.call() {
        Some(greeting) => println!("{greeting}"),
        None => std::process::exit(1),
    }
}
