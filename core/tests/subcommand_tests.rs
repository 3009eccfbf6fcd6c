use std::sync::OnceLock;

use command_args_core::*;

fn top_command() -> CommandSchema {
    let cases = CommandSchema::new("SubCommand")
        .with_subcommand(
            "first",
            SubcommandSchema::new("first").with_body(
                CommandSchema::new("first")
                    .with_flag("some_option", FlagSchema::boolean(&["-s", "--some-option"])),
            ),
        )
        .with_subcommand("second", SubcommandSchema::new("second"))
        .with_subcommand(
            "copy",
            SubcommandSchema::new("copy").with_body(
                CommandSchema::new("copy")
                    .with_arg("source", ArgSchema::new(0))
                    .with_arg("destination", ArgSchema::new(1)),
            ),
        );

    CommandSchema::new("TopCommand")
        .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
        .with_flag(
            "string_option",
            FlagSchema::with_value(&["-t", "--string-option"]).with_value_name("stringOption"),
        )
        .with_group("command", cases)
}

fn selected(parsed: &ParsedCommand) -> Vec<&str> {
    parsed.selected_path()
}

#[test]
fn test_ancestor_option_before_subcommand() {
    let parsed = parse(["-v", "first"], &top_command()).unwrap();

    assert_eq!(parsed.flag("verbose"), Some(true));
    assert_eq!(selected(&parsed), vec!["first"]);
}

#[test]
fn test_ancestor_option_after_subcommand() {
    let schema = top_command();
    let before = parse(["-v", "first"], &schema).unwrap();
    let after = parse(["first", "-v"], &schema).unwrap();

    assert_eq!(before, after);
}

#[test]
fn test_option_value_naming_sibling_case_is_literal() {
    let parsed = parse(["second", "-t", "first"], &top_command()).unwrap();

    assert_eq!(parsed.text("string_option"), Some("first"));
    assert_eq!(selected(&parsed), vec!["second"]);
}

#[test]
fn test_parameters_advance_ordinal_in_nested_case() {
    let parsed = parse(["copy", "source.txt", "dest.txt"], &top_command()).unwrap();

    let copy = parsed
        .command("command")
        .and_then(|cases| cases.command("copy"))
        .unwrap();
    assert_eq!(copy.text("source"), Some("source.txt"));
    assert_eq!(copy.text("destination"), Some("dest.txt"));
}

#[test]
fn test_value_token_is_never_a_flag() {
    let parsed = parse(["first", "-t", "-v"], &top_command()).unwrap();

    assert_eq!(parsed.text("string_option"), Some("-v"));
    assert_eq!(parsed.flag("verbose"), None);
}

#[test]
fn test_deferred_boolean_does_not_take_value() {
    let err = parse(["second", "-v", "true"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("true".to_string()));

    let err = parse(["first", "-v", "true"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("true".to_string()));
}

#[test]
fn test_positional_without_parameter_is_rejected() {
    let err = parse(["first", "-v", "myfile.txt"], &top_command()).unwrap_err();

    assert_eq!(err, SyntaxError::UnexpectedArgument("myfile.txt".to_string()));
    assert_eq!(err.to_string(), "Unexpected argument: 'myfile.txt'");
}

#[test]
fn test_unknown_flag_is_rejected() {
    let err = parse(["first", "-x"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("-x".to_string()));

    let err = parse(["-x", "first"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("-x".to_string()));
}

#[test]
fn test_unknown_case_is_rejected() {
    let err = parse(["third"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("third".to_string()));
}

#[test]
fn test_multiple_deferred_options() {
    let parsed = parse(["first", "-s", "-t", "value", "--verbose"], &top_command()).unwrap();

    assert_eq!(parsed.flag("verbose"), Some(true));
    assert_eq!(parsed.text("string_option"), Some("value"));
    let first = parsed
        .command("command")
        .and_then(|cases| cases.command("first"))
        .unwrap();
    assert_eq!(first.flag("some_option"), Some(true));
}

#[test]
fn test_missing_deferred_value() {
    let err = parse(["first", "-t"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::MissingValue("-t".to_string()));

    let err = parse(["-t"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::MissingValue("-t".to_string()));
}

#[test]
fn test_flag_permutations_parse_identically() {
    let schema = top_command();
    let permutations: [&[&str]; 6] = [
        &["-v", "-t", "x", "first", "-s"],
        &["first", "-s", "-v", "-t", "x"],
        &["-t", "x", "first", "-v", "-s"],
        &["first", "-t", "x", "-s", "-v"],
        &["-v", "first", "-t", "x", "-s"],
        &["-t", "x", "-v", "first", "-s"],
    ];

    let expected = parse(permutations[0].iter().copied(), &schema).unwrap();
    for tokens in &permutations[1..] {
        let parsed = parse(tokens.iter().copied(), &schema).unwrap();
        assert_eq!(parsed, expected, "tokens: {tokens:?}");
    }
}

#[test]
fn test_parse_is_idempotent() {
    let schema = top_command();
    let tokens = ["copy", "-v", "a.txt", "-t", "first", "b.txt"];

    let once = parse(tokens, &schema).unwrap();
    let twice = parse(tokens, &schema).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_ordinal_is_shared_across_levels() {
    let add = CommandSchema::new("add")
        .with_arg("name", ArgSchema::new(0))
        .with_arg("url", ArgSchema::new(1));
    let actions = CommandSchema::new("RemoteAction")
        .with_subcommand("add", SubcommandSchema::new("add").with_body(add))
        .with_subcommand("list", SubcommandSchema::new("list"));
    let remote = CommandSchema::new("remote")
        .with_flag("dry_run", FlagSchema::boolean(&["-n", "--dry-run"]))
        .with_group("action", actions);
    let cases = CommandSchema::new("Command")
        .with_subcommand("remote", SubcommandSchema::new("remote").with_body(remote));
    let schema = CommandSchema::new("git")
        .with_flag("verbose", FlagSchema::boolean(&["-v"]))
        .with_group("command", cases);

    let parsed = parse(
        ["remote", "add", "-v", "origin", "-n", "https://example.com/repo"],
        &schema,
    )
    .unwrap();

    assert_eq!(parsed.flag("verbose"), Some(true));
    assert_eq!(parsed.selected_path(), vec!["remote", "add"]);
    let remote = parsed
        .command("command")
        .and_then(|cases| cases.command("remote"))
        .unwrap();
    assert_eq!(remote.flag("dry_run"), Some(true));
    let add = remote
        .command("action")
        .and_then(|actions| actions.command("add"))
        .unwrap();
    assert_eq!(add.text("name"), Some("origin"));
    assert_eq!(add.text("url"), Some("https://example.com/repo"));
}

#[test]
fn test_help_flags_are_ordinary_tokens_without_interception() {
    let err = parse(["--help"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("--help".to_string()));
}

#[test]
fn test_help_requested_at_multiple_levels() {
    let outcome = parse_with_help(["-h", "first", "--help"], &top_command()).unwrap();

    assert_eq!(
        outcome.help_levels(),
        &[
            HelpLevel {
                command: "TopCommand".to_string(),
                path: vec![],
            },
            HelpLevel {
                command: "first".to_string(),
                path: vec!["first".to_string()],
            },
        ]
    );
    assert!(outcome.parsed().is_none());
}

#[test]
fn test_help_at_bodiless_case() {
    let outcome = parse_with_help(["second", "-h"], &top_command()).unwrap();

    let levels = outcome.help_levels();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].command, "SubCommand");
    assert_eq!(levels[0].path, vec!["second".to_string()]);
    assert_eq!(
        render_help_for_level(&top_command(), &levels[0]).as_deref(),
        Some("usage: TopCommand second\n")
    );
}

#[test]
fn test_help_does_not_mask_syntax_errors() {
    let err = parse_with_help(["--help", "-x"], &top_command()).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("-x".to_string()));
}

#[test]
fn test_parse_with_help_without_help_flags() {
    let outcome = parse_with_help(["first", "-v"], &top_command()).unwrap();
    let parsed = outcome.parsed().unwrap();

    assert_eq!(parsed.flag("verbose"), Some(true));
}

#[test]
fn test_custom_help_flags() {
    let config = ParserConfig {
        handle_help: true,
        help_flags: vec!["-?".to_string()],
    };

    let outcome = parse_with_config(["first", "-?"], &top_command(), &config).unwrap();
    assert_eq!(outcome.help_levels()[0].path, vec!["first".to_string()]);

    let err = parse_with_config(["--help"], &top_command(), &config).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("--help".to_string()));
}

#[test]
fn test_literal_help_sample() {
    let cases = CommandSchema::new("SubCommand")
        .with_subcommand("first", SubcommandSchema::new("first"))
        .with_subcommand("second", SubcommandSchema::new("second"));
    let schema = CommandSchema::new("TopCommand")
        .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
        .with_flag("help", FlagSchema::boolean(&["-h", "--help"]))
        .with_flag(
            "string_option",
            FlagSchema::with_value(&["-t", "--string-option"]).with_value_name("stringOption"),
        )
        .with_group("command", cases);

    let expected = "\
usage: TopCommand [-v | --verbose] [-h | --help] [-t | --string-option <stringOption>] <command>

Options:
    -v, --verbose
    -h, --help
    -t, --string-option  <stringOption>

Commands:
    first
    second
";
    assert_eq!(render_help(&schema), expected);
}

#[test]
fn test_invalid_schema_is_rejected_before_parsing() {
    let schema = CommandSchema::new("tool")
        .with_arg("path", ArgSchema::new(0))
        .with_group(
            "command",
            CommandSchema::new("Cases").with_subcommand("run", SubcommandSchema::new("run")),
        );

    let err = parse(["run"], &schema).unwrap_err();
    assert_eq!(
        err,
        SyntaxError::InvalidSchema(ValidationError::ParametersWithCommandGroup(
            "tool".to_string()
        ))
    );
}

#[test]
fn test_parameters_above_a_case_body_are_rejected() {
    let copy = CommandSchema::new("copy")
        .with_arg("source", ArgSchema::new(0))
        .with_arg("destination", ArgSchema::new(1));
    let schema = CommandSchema::new("tool")
        .with_arg("file", ArgSchema::new(0))
        .with_subcommand("copy", SubcommandSchema::new("copy").with_body(copy));

    let err = parse(["x", "copy", "a", "b"], &schema).unwrap_err();
    assert_eq!(
        err,
        SyntaxError::InvalidSchema(ValidationError::ParametersWithSubcommand(
            "tool".to_string()
        ))
    );
}

#[test]
fn test_ancestor_collision_is_rejected() {
    let cases = CommandSchema::new("Cases").with_subcommand(
        "run",
        SubcommandSchema::new("run")
            .with_body(CommandSchema::new("run").with_flag("verbose", FlagSchema::boolean(&["-v"]))),
    );
    let schema = CommandSchema::new("tool")
        .with_flag("verbose", FlagSchema::boolean(&["-v"]))
        .with_group("command", cases);

    let err = parse(["run", "-v"], &schema).unwrap_err();
    assert_eq!(
        err,
        SyntaxError::InvalidSchema(ValidationError::AncestorFlagCollision {
            command: "run".to_string(),
            flag: "-v".to_string(),
        })
    );
}

// Strongly typed commands driving the deserializer directly.

#[derive(Debug, Default, PartialEq)]
struct TopCommand {
    verbose: Option<bool>,
    string_option: Option<String>,
    command: Option<SubCommand>,
}

#[derive(Debug, PartialEq)]
enum SubCommand {
    First(First),
    Second,
}

#[derive(Debug, Default, PartialEq)]
struct First {
    some_option: Option<bool>,
}

impl FromArgs for First {
    fn command() -> &'static CommandSchema {
        static SCHEMA: OnceLock<CommandSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            CommandSchema::new("first")
                .with_flag("some_option", FlagSchema::boolean(&["-s", "--some-option"]))
        })
    }

    fn from_args(de: &mut Deserializer<'_>) -> Result<Self> {
        de.open(Self::command());
        let mut out = Self::default();
        while let Resolution::Field(_) = de.next_field()? {
            out.some_option = de.read_value()?.into_flag();
        }
        de.close()?;
        Ok(out)
    }
}

impl FromArgs for SubCommand {
    fn command() -> &'static CommandSchema {
        static SCHEMA: OnceLock<CommandSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            CommandSchema::new("SubCommand")
                .with_subcommand(
                    "first",
                    SubcommandSchema::new("first").with_body(First::command().clone()),
                )
                .with_subcommand("second", SubcommandSchema::new("second"))
        })
    }

    fn from_args(de: &mut Deserializer<'_>) -> Result<Self> {
        de.open(Self::command());
        let mut out = None;
        while let Resolution::Field(index) = de.next_field()? {
            out = Some(match index {
                0 => Self::First(First::from_args(de)?),
                _ => Self::Second,
            });
        }
        de.close()?;
        out.ok_or_else(|| SyntaxError::NoPendingValue("command".to_string()))
    }
}

impl FromArgs for TopCommand {
    fn command() -> &'static CommandSchema {
        static SCHEMA: OnceLock<CommandSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            CommandSchema::new("TopCommand")
                .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
                .with_flag("string_option", FlagSchema::with_value(&["-t", "--string-option"]))
                .with_group("command", SubCommand::command().clone())
        })
    }

    fn from_args(de: &mut Deserializer<'_>) -> Result<Self> {
        de.open(Self::command());
        let mut out = Self::default();
        while let Resolution::Field(index) = de.next_field()? {
            match index {
                0 => out.verbose = de.read_value()?.into_flag(),
                1 => out.string_option = de.read_value()?.into_text(),
                _ => out.command = Some(SubCommand::from_args(de)?),
            }
        }
        de.close()?;
        Ok(out)
    }
}

#[test]
fn test_typed_ancestor_option_after_case() {
    let parsed: TopCommand = parse_as(["first", "-v"]).unwrap();

    assert_eq!(
        parsed,
        TopCommand {
            verbose: Some(true),
            string_option: None,
            command: Some(SubCommand::First(First::default())),
        }
    );
}

#[test]
fn test_typed_value_naming_sibling_case() {
    let parsed: TopCommand = parse_as(["second", "-t", "first"]).unwrap();

    assert_eq!(parsed.string_option.as_deref(), Some("first"));
    assert_eq!(parsed.command, Some(SubCommand::Second));
}

#[test]
fn test_typed_nested_option() {
    let parsed: TopCommand = parse_as(["-t", "x", "first", "--some-option"]).unwrap();

    assert_eq!(
        parsed.command,
        Some(SubCommand::First(First {
            some_option: Some(true)
        }))
    );
}

#[test]
fn test_typed_rejects_unknown_tokens() {
    let err = parse_as::<TopCommand, _, _>(["first", "-v", "true"]).unwrap_err();
    assert_eq!(err, SyntaxError::UnexpectedArgument("true".to_string()));
}

#[test]
fn test_typed_help_request() {
    let outcome = parse_as_with_help::<TopCommand, _, _>(["first", "-h"]).unwrap();

    let levels = outcome.help_levels();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].command, "first");
    let help = render_help_for_level(TopCommand::command(), &levels[0]).unwrap();
    assert!(help.starts_with("usage: TopCommand first [-s | --some-option]\n"));
}

#[test]
fn test_typed_parses_are_independent() {
    let first: TopCommand = parse_as(["first", "-v"]).unwrap();
    let second: TopCommand = parse_as(["second"]).unwrap();

    assert_eq!(first.verbose, Some(true));
    assert_eq!(second.verbose, None);
    assert_eq!(second.command, Some(SubCommand::Second));
}
