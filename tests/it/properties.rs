//! Property tests for the parsing pipeline.

use chrono::{TimeZone, Utc};
use dflags::{Cli, Command, ConfigError, FlagValue, Kind, Opt, Parser};
use proptest::prelude::*;

fn typed() -> Parser {
    Cli::new("typed")
        .option(Opt::new("s", ""))
        .option(Opt::new("n", 0))
        .option(Opt::new("b", false))
        .option(Opt::required("d", Kind::Date))
        .build()
        .unwrap()
}

fn fixed() -> Parser {
    Cli::new("fixed")
        .option(Opt::new("name", "").short('N'))
        .option(Opt::new("count", 0).short('c'))
        .option(Opt::new("force", false).short('f'))
        .option(Opt::new("mode", "a").one_of(["a", "b"]))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_canonical_rendering_roundtrips(
        s in "\\PC*",
        n in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
        b in any::<bool>(),
        millis in -8_000_000_000_000_i64..8_000_000_000_000_i64,
    ) {
        let d = Utc.timestamp_millis_opt(millis).unwrap();
        let args = vec![
            format!("--s={s}"),
            format!("--n={}", FlagValue::Number(n)),
            format!("--b={b}"),
            format!("--d={}", FlagValue::Date(d)),
        ];
        let parser = typed();
        let parsed = parser.parse(args).unwrap();
        prop_assert_eq!(parsed.flags.str("s"), Some(s.as_str()));
        prop_assert_eq!(parsed.flags.number("n"), Some(n));
        prop_assert_eq!(parsed.flags.bool("b"), Some(b));
        prop_assert_eq!(parsed.flags.date("d"), Some(d));
    }

    #[test]
    fn prop_flag_order_does_not_matter(
        groups in Just(vec![
            vec!["--name", "ann"],
            vec!["-c", "3"],
            vec!["-f"],
            vec!["--mode=b"],
        ]).prop_shuffle()
    ) {
        let parser = fixed();
        let baseline = parser.parse(["--name", "ann", "-c", "3", "-f", "--mode=b"]).unwrap();
        let args = groups.concat();
        let parsed = parser.parse(args).unwrap();
        prop_assert_eq!(parsed.flags, baseline.flags);
    }

    #[test]
    fn prop_fixed_arity_is_exact(declared in 0_usize..6, supplied in 0_usize..6) {
        let names = (0..declared).map(|i| format!("arg{i}")).collect::<Vec<_>>();
        let parser = Cli::new("x").command(Command::new("run", names, |_, _| ())).build().unwrap();
        let mut args = vec!["run".to_string()];
        args.extend((0..supplied).map(|i| i.to_string()));
        prop_assert_eq!(parser.parse(args).is_ok(), declared == supplied);
    }

    #[test]
    fn prop_unknown_flags_are_ignored(
        unknown in proptest::collection::vec(
            ("[a-z]{1,8}", proptest::option::of("[a-z0-9]{1,4}")),
            0..6,
        )
    ) {
        let parser = fixed();
        let known = ["--name", "ann", "-c", "3"];
        let baseline = parser.parse(known).unwrap();

        let mut args = Vec::new();
        for (name, value) in &unknown {
            args.push(format!("--zz-{name}"));
            args.extend(value.clone());
        }
        args.extend(known.iter().map(|it| it.to_string()));

        let parsed = parser.parse(args).unwrap();
        prop_assert_eq!(parsed.flags.len(), 4);
        prop_assert_eq!(&parsed.flags, &baseline.flags);
        prop_assert!(parsed.flags.iter().all(|(key, _)| !key.starts_with("zz")));
    }

    #[test]
    fn prop_alias_collisions_fail_at_build(short in "[a-zA-Z]", long in "[a-z]{1,10}") {
        let short = short.chars().next().unwrap();
        let res = Cli::new("x")
            .option(Opt::new("first", false).short(short))
            .option(Opt::new("second", 0).short(short))
            .build();
        let is_collision = matches!(res, Err(ConfigError::AliasCollision { .. }));
        prop_assert!(is_collision);

        let res = Cli::new("x")
            .option(Opt::new("first", false).long(&long))
            .option(Opt::new("second", "").long(&long))
            .build();
        let is_collision = matches!(res, Err(ConfigError::AliasCollision { .. }));
        prop_assert!(is_collision);
    }
}
