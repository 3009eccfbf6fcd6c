//! Object builders that drive a [`Deserializer`].
//!
//! Two ways to turn tokens into a value:
//!
//! - [`build_command`] walks any [`CommandSchema`] and produces a generic
//!   [`ParsedCommand`] tree.
//! - [`FromArgs`] is implemented by strongly typed command structs and
//!   enums that resolve their own fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deserializer::{ArgValue, Deserializer, Resolution};
use crate::error::Result;
use crate::types::{CommandSchema, FieldKind};

/// Value of one resolved field in a [`ParsedCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A boolean switch.
    Flag(bool),
    /// A verbatim token (option value or positional parameter).
    Text(String),
    /// A nested level (command group, or a subcommand case with a body).
    Command(ParsedCommand),
}

impl From<ArgValue> for FieldValue {
    fn from(value: ArgValue) -> Self {
        match value {
            ArgValue::Flag(flag) => Self::Flag(flag),
            ArgValue::Text(text) => Self::Text(text),
        }
    }
}

/// Generic parse result for one command level.
///
/// Only fields that were present in the tokens appear in `values`.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let cases = CommandSchema::new("SubCommand")
///     .with_subcommand("first", SubcommandSchema::new("first"));
/// let schema = CommandSchema::new("TopCommand")
///     .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
///     .with_group("command", cases);
///
/// let parsed = parse(["first", "-v"], &schema).unwrap();
/// assert_eq!(parsed.flag("verbose"), Some(true));
/// assert_eq!(parsed.selected_path(), vec!["first"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// Name of the schema this level was built from.
    pub name: String,
    /// Subcommand case selected at this level, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    /// Resolved field values keyed by field name.
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
}

impl ParsedCommand {
    /// Creates an empty result for the level named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Returns the switch state of `field`, if it was given.
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.values.get(field)? {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value of `field`, if it was given.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field)? {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested level stored in `field`, if it was selected.
    pub fn command(&self, field: &str) -> Option<&ParsedCommand> {
        match self.values.get(field)? {
            FieldValue::Command(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested level selected at this level, if any.
    pub fn subcommand(&self) -> Option<&ParsedCommand> {
        self.values.values().find_map(|value| match value {
            FieldValue::Command(nested) => Some(nested),
            _ => None,
        })
    }

    /// Case names selected from this level downwards.
    pub fn selected_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(level) = current {
            if let Some(case) = &level.case {
                path.push(case.as_str());
            }
            current = level.subcommand();
        }
        path
    }
}

/// Resolves every field of `schema` into a [`ParsedCommand`], recursing into
/// groups and subcommand bodies.
///
/// # Errors
///
/// Propagates the first [`SyntaxError`](crate::SyntaxError) raised while
/// resolving this level or any nested one.
pub fn build_command<'a>(
    de: &mut Deserializer<'a>,
    schema: &'a CommandSchema,
) -> Result<ParsedCommand> {
    de.open(schema);
    let mut parsed = ParsedCommand::new(&schema.name);

    while let Resolution::Field(index) = de.next_field()? {
        let field = &schema.fields[index];
        match &field.kind {
            FieldKind::Option(_) | FieldKind::Parameter(_) => {
                let value = de.read_value()?;
                parsed.values.insert(field.name.clone(), value.into());
            }
            FieldKind::Subcommand(sub) => {
                parsed.case = Some(sub.literal.clone());
                if let Some(body) = &sub.body {
                    let nested = build_command(de, body)?;
                    parsed
                        .values
                        .insert(field.name.clone(), FieldValue::Command(nested));
                }
            }
            FieldKind::Group(group) => {
                let nested = build_command(de, &group.schema)?;
                parsed
                    .values
                    .insert(field.name.clone(), FieldValue::Command(nested));
            }
        }
    }

    de.close()?;
    Ok(parsed)
}

/// A command type that resolves its own fields from a [`Deserializer`].
///
/// Implementations open their schema, loop over
/// [`next_field`](Deserializer::next_field) until
/// [`Resolution::EndOfType`], and close the level. Schemas are usually
/// built once and cached in a `OnceLock`.
///
/// # Examples
///
/// ```
/// use std::sync::OnceLock;
///
/// use command_args_core::*;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Copy {
///     force: Option<bool>,
///     source: Option<String>,
/// }
///
/// impl FromArgs for Copy {
///     fn command() -> &'static CommandSchema {
///         static SCHEMA: OnceLock<CommandSchema> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             CommandSchema::new("copy")
///                 .with_flag("force", FlagSchema::boolean(&["-f", "--force"]))
///                 .with_arg("source", ArgSchema::new(0))
///         })
///     }
///
///     fn from_args(de: &mut Deserializer<'_>) -> Result<Self> {
///         de.open(Self::command());
///         let mut out = Self::default();
///         while let Resolution::Field(index) = de.next_field()? {
///             match index {
///                 0 => out.force = de.read_value()?.into_flag(),
///                 _ => out.source = de.read_value()?.into_text(),
///             }
///         }
///         de.close()?;
///         Ok(out)
///     }
/// }
///
/// let copy: Copy = parse_as(["a.txt", "--force"]).unwrap();
/// assert_eq!(copy, Copy { force: Some(true), source: Some("a.txt".into()) });
/// ```
pub trait FromArgs: Sized {
    /// Schema for this type's level.
    fn command() -> &'static CommandSchema;

    /// Resolves this type's fields, pushing and popping its own level.
    fn from_args(de: &mut Deserializer<'_>) -> Result<Self>;
}
