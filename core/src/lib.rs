//! Schema-driven command-line parsing.
//!
//! This crate turns a flat list of tokens into a nested command value using
//! an explicit schema:
//!
//! - [`CommandSchema`]: ordered field descriptors for one command level.
//! - [`FlagSchema`]: an option with one or more aliases, boolean or
//!   value-taking.
//! - [`ArgSchema`]: a positional parameter at a fixed ordinal.
//! - [`SubcommandSchema`]: a literal case, optionally with its own fields.
//! - [`GroupSchema`]: a field whose value is a nested union of cases.
//!
//! Options declared by an enclosing command are accepted anywhere below it:
//! a level that does not know an option hands it (with its value) to the
//! enclosing level that declares it, which claims it once the tokens are
//! exhausted. Tokens no active level knows are rejected with a
//! [`SyntaxError`].
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//!
//! let cases = CommandSchema::new("SubCommand")
//!     .with_subcommand("first", SubcommandSchema::new("first"))
//!     .with_subcommand("second", SubcommandSchema::new("second"));
//! let schema = CommandSchema::new("TopCommand")
//!     .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
//!     .with_flag("string_option", FlagSchema::with_value(&["-t", "--string-option"]))
//!     .with_group("command", cases);
//!
//! let parsed = parse(["second", "-t", "first"], &schema).unwrap();
//! assert_eq!(parsed.text("string_option"), Some("first"));
//! assert_eq!(parsed.selected_path(), vec!["second"]);
//!
//! match parse_with_help(["first", "--help"], &schema).unwrap() {
//!     ParseOutcome::HelpRequested(levels) => assert_eq!(levels[0].path, vec!["first"]),
//!     ParseOutcome::Parsed(_) => unreachable!(),
//! }
//! ```

mod builder;
mod config;
mod cursor;
mod deserializer;
mod error;
mod help;
mod resolver;
mod types;
mod validate;

pub use builder::{FieldValue, FromArgs, ParsedCommand, build_command};
pub use config::{ParserConfig, load_schema};
pub use deserializer::{ArgValue, Deserializer, Resolution};
pub use error::{ConfigError, Result, SyntaxError};
pub use help::{render_help, render_help_for_level, render_help_for_path};
pub use resolver::HelpLevel;
pub use types::*;
pub use validate::{ValidationError, validate_command};

/// Result of a parse that intercepts help flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// Tokens were parsed into a value.
    Parsed(T),
    /// At least one level saw a help flag; lists every such level in the
    /// order the flags appeared.
    HelpRequested(Vec<HelpLevel>),
}

impl<T> ParseOutcome<T> {
    /// Returns the parsed value, or `None` if help was requested.
    pub fn parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::HelpRequested(_) => None,
        }
    }

    /// Returns the help levels, or an empty slice if the parse completed.
    pub fn help_levels(&self) -> &[HelpLevel] {
        match self {
            Self::Parsed(_) => &[],
            Self::HelpRequested(levels) => levels,
        }
    }
}

/// Parses `args` against `schema` without help interception.
///
/// # Errors
///
/// Returns [`SyntaxError::InvalidSchema`] if `schema` fails validation, or
/// the first syntax error found in `args`.
pub fn parse<I, S>(args: I, schema: &CommandSchema) -> Result<ParsedCommand>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (parsed, _) = run(args, schema, ParserConfig::without_help())?;
    Ok(parsed)
}

/// Parses `args` against `schema`, intercepting `-h`/`--help` at every level.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_help<I, S>(args: I, schema: &CommandSchema) -> Result<ParseOutcome<ParsedCommand>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parse_with_config(args, schema, &ParserConfig::default())
}

/// Parses `args` against `schema` using `config`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with_config<I, S>(
    args: I,
    schema: &CommandSchema,
    config: &ParserConfig,
) -> Result<ParseOutcome<ParsedCommand>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (parsed, help) = run(args, schema, config.clone())?;
    Ok(outcome(parsed, help))
}

/// Parses `args` into a typed command without help interception.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_as<T, I, S>(args: I) -> Result<T>
where
    T: FromArgs,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (value, _) = run_typed(args, ParserConfig::without_help())?;
    Ok(value)
}

/// Parses `args` into a typed command, intercepting help flags.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_as_with_help<T, I, S>(args: I) -> Result<ParseOutcome<T>>
where
    T: FromArgs,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (value, help) = run_typed(args, ParserConfig::default())?;
    Ok(outcome(value, help))
}

fn outcome<T>(value: T, help: Vec<HelpLevel>) -> ParseOutcome<T> {
    if help.is_empty() {
        ParseOutcome::Parsed(value)
    } else {
        ParseOutcome::HelpRequested(help)
    }
}

fn check_schema(schema: &CommandSchema) -> Result<()> {
    match validate_command(schema).into_iter().next() {
        Some(err) => Err(SyntaxError::InvalidSchema(err)),
        None => Ok(()),
    }
}

fn run<I, S>(
    args: I,
    schema: &CommandSchema,
    config: ParserConfig,
) -> Result<(ParsedCommand, Vec<HelpLevel>)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    check_schema(schema)?;
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut de = Deserializer::new(&tokens, config);
    let parsed = build_command(&mut de, schema)?;
    Ok((parsed, de.into_help_levels()))
}

fn run_typed<T, I, S>(args: I, config: ParserConfig) -> Result<(T, Vec<HelpLevel>)>
where
    T: FromArgs,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    check_schema(T::command())?;
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut de = Deserializer::new(&tokens, config);
    let value = T::from_args(&mut de)?;
    Ok((value, de.into_help_levels()))
}
