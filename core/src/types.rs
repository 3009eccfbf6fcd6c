//! Schema type definitions for command-line parsing.
//!
//! A [`CommandSchema`] describes one command level: an ordered list of
//! [`FieldSchema`] descriptors, each of which is exactly one of an option
//! ([`FlagSchema`]), a positional parameter ([`ArgSchema`]), a subcommand
//! case ([`SubcommandSchema`]) or a nested command group ([`GroupSchema`]).
//! The position of a descriptor in that list is its field index, which is
//! what the resolver hands back to whoever is building the parsed value.
//!
//! Schemas are plain data. They can be written by hand, assembled with the
//! builder methods below, or loaded from JSON/YAML through serde.

use serde::{Deserialize, Serialize};

/// Leading marker that distinguishes option tokens from positional text.
pub const FLAG_SIGIL: char = '-';

/// Returns `true` if `token` is shaped like an option flag.
///
/// # Examples
///
/// ```
/// use command_args_core::is_flag;
///
/// assert!(is_flag("-v"));
/// assert!(is_flag("--verbose"));
/// assert!(!is_flag("first"));
/// ```
pub fn is_flag(token: &str) -> bool {
    token.starts_with(FLAG_SIGIL)
}

/// Schema for an option flag.
///
/// An option has one or more alias names (e.g. `-v` and `--verbose`) and
/// either stands alone as a boolean switch or consumes the following token
/// verbatim as its value.
///
/// # Examples
///
/// ```
/// use command_args_core::FlagSchema;
///
/// let verbose = FlagSchema::boolean(&["-v", "--verbose"]);
/// assert!(!verbose.takes_value);
/// assert_eq!(verbose.canonical_name(), "--verbose");
///
/// let output = FlagSchema::with_value(&["-o", "--output"]).with_value_name("path");
/// assert!(output.takes_value);
/// assert!(output.matches("-o"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSchema {
    /// Alias flag names in declaration order (e.g. `["-v", "--verbose"]`).
    pub aliases: Vec<String>,
    /// Whether the next token is consumed as this option's value.
    #[serde(default)]
    pub takes_value: bool,
    /// Placeholder shown in help text for the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
}

impl FlagSchema {
    /// Creates a boolean flag (no value).
    pub fn boolean(aliases: &[&str]) -> Self {
        Self {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            takes_value: false,
            value_name: None,
        }
    }

    /// Creates a flag that consumes the following token as its value.
    pub fn with_value(aliases: &[&str]) -> Self {
        Self {
            takes_value: true,
            ..Self::boolean(aliases)
        }
    }

    /// Sets the help placeholder for the value.
    pub fn with_value_name(mut self, name: &str) -> Self {
        self.value_name = Some(name.to_string());
        self
    }

    /// Returns the canonical name (first long alias, falls back to the first alias).
    pub fn canonical_name(&self) -> &str {
        self.aliases
            .iter()
            .find(|a| a.starts_with("--"))
            .or_else(|| self.aliases.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Checks if any alias equals `token` exactly.
    pub fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|a| a == token)
    }
}

/// Schema for a positional parameter.
///
/// # Examples
///
/// ```
/// use command_args_core::ArgSchema;
///
/// let source = ArgSchema::new(0);
/// assert_eq!(source.ordinal, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSchema {
    /// Zero-based position among the positional tokens of one parse.
    pub ordinal: usize,
}

impl ArgSchema {
    /// Creates a parameter at `ordinal`.
    pub fn new(ordinal: usize) -> Self {
        Self { ordinal }
    }
}

/// Schema for a subcommand case.
///
/// The literal is matched exactly against a non-flag token. A case may carry
/// a body: the nested level whose fields are resolved after the literal has
/// been consumed.
///
/// # Examples
///
/// ```
/// use command_args_core::{CommandSchema, FlagSchema, SubcommandSchema};
///
/// let first = SubcommandSchema::new("first").with_body(
///     CommandSchema::new("first").with_flag("some_option", FlagSchema::boolean(&["-s"])),
/// );
/// assert_eq!(first.literal, "first");
/// assert!(first.body.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcommandSchema {
    /// Literal token that selects this case.
    pub literal: String,
    /// Fields resolved inside this case, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<CommandSchema>>,
}

impl SubcommandSchema {
    /// Creates a case with no further fields.
    pub fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
            body: None,
        }
    }

    /// Attaches the nested level resolved after this case is selected.
    pub fn with_body(mut self, body: CommandSchema) -> Self {
        self.body = Some(Box::new(body));
        self
    }
}

/// Schema for a command group: a field whose value is a nested union of
/// subcommand cases.
///
/// Matching one of the case names selects the group without consuming the
/// token; the nested level then consumes it through its own subcommand match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchema {
    /// The nested level, whose subcommand cases are this group's case names.
    pub schema: Box<CommandSchema>,
}

impl GroupSchema {
    /// Creates a group over `schema`.
    pub fn new(schema: CommandSchema) -> Self {
        Self {
            schema: Box::new(schema),
        }
    }

    /// Case names drawn from the nested schema, in declaration order.
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.schema.subcommands().map(|(_, sub)| sub.literal.as_str())
    }

    /// Returns `true` if `token` names one of this group's cases.
    pub fn has_case(&self, token: &str) -> bool {
        self.case_names().any(|name| name == token)
    }
}

/// What a field descriptor selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// An option flag.
    Option(FlagSchema),
    /// A positional parameter.
    Parameter(ArgSchema),
    /// A subcommand case literal.
    Subcommand(SubcommandSchema),
    /// A nested command group.
    Group(GroupSchema),
}

/// One ordered field descriptor of a command level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field identifier (e.g. `verbose`).
    pub name: String,
    /// Short description used in help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// What this field selects.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Creates a descriptor named `name`.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            kind,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Complete schema for one command level.
///
/// Fields keep declaration order; a field's index in [`fields`] is the
/// identifier reported by the resolver.
///
/// [`fields`]: CommandSchema::fields
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let cases = CommandSchema::new("SubCommand")
///     .with_subcommand("first", SubcommandSchema::new("first"))
///     .with_subcommand("second", SubcommandSchema::new("second"));
///
/// let top = CommandSchema::new("TopCommand")
///     .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]))
///     .with_flag("string_option", FlagSchema::with_value(&["-t", "--string-option"]))
///     .with_group("command", cases);
///
/// assert_eq!(top.find_option("-t").map(|(index, _)| index), Some(1));
/// assert_eq!(top.find_group("second").map(|(index, _)| index), Some(2));
/// assert!(top.find_subcommand("first").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command name used in usage lines (e.g. `TopCommand`).
    pub name: String,
    /// Short description of the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered field descriptors.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl CommandSchema {
    /// Creates an empty command schema.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builds a schema from ordered descriptors, rejecting it if it is invalid.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`](crate::ValidationError) found
    /// by [`validate_command`](crate::validate_command).
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_core::*;
    ///
    /// let bad = CommandSchema::from_fields(
    ///     "copy",
    ///     vec![
    ///         FieldSchema::new("source", FieldKind::Parameter(ArgSchema::new(0))),
    ///         FieldSchema::new("target", FieldKind::Parameter(ArgSchema::new(0))),
    ///     ],
    /// );
    /// assert_eq!(bad, Err(ValidationError::DuplicateParameter(0)));
    /// ```
    pub fn from_fields(
        name: &str,
        fields: Vec<FieldSchema>,
    ) -> Result<Self, crate::ValidationError> {
        let schema = Self {
            name: name.to_string(),
            description: None,
            fields,
        };
        match crate::validate_command(&schema).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(schema),
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a descriptor.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends an option field.
    pub fn with_flag(self, name: &str, flag: FlagSchema) -> Self {
        self.with_field(FieldSchema::new(name, FieldKind::Option(flag)))
    }

    /// Appends a positional parameter field.
    pub fn with_arg(self, name: &str, arg: ArgSchema) -> Self {
        self.with_field(FieldSchema::new(name, FieldKind::Parameter(arg)))
    }

    /// Appends a subcommand case field.
    pub fn with_subcommand(self, name: &str, sub: SubcommandSchema) -> Self {
        self.with_field(FieldSchema::new(name, FieldKind::Subcommand(sub)))
    }

    /// Appends a command group field over `cases`.
    pub fn with_group(self, name: &str, cases: CommandSchema) -> Self {
        self.with_field(FieldSchema::new(name, FieldKind::Group(GroupSchema::new(cases))))
    }

    /// Returns the descriptor at `index`.
    pub fn field(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    /// Option fields with their indices, in declaration order.
    pub fn options(&self) -> impl Iterator<Item = (usize, &FlagSchema)> {
        self.fields.iter().enumerate().filter_map(|(i, f)| match &f.kind {
            FieldKind::Option(flag) => Some((i, flag)),
            _ => None,
        })
    }

    /// Parameter fields with their indices, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = (usize, &ArgSchema)> {
        self.fields.iter().enumerate().filter_map(|(i, f)| match &f.kind {
            FieldKind::Parameter(arg) => Some((i, arg)),
            _ => None,
        })
    }

    /// Subcommand case fields with their indices, in declaration order.
    pub fn subcommands(&self) -> impl Iterator<Item = (usize, &SubcommandSchema)> {
        self.fields.iter().enumerate().filter_map(|(i, f)| match &f.kind {
            FieldKind::Subcommand(sub) => Some((i, sub)),
            _ => None,
        })
    }

    /// Command group fields with their indices, in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &GroupSchema)> {
        self.fields.iter().enumerate().filter_map(|(i, f)| match &f.kind {
            FieldKind::Group(group) => Some((i, group)),
            _ => None,
        })
    }

    /// Finds the option with an alias equal to `token`.
    pub fn find_option(&self, token: &str) -> Option<(usize, &FlagSchema)> {
        self.options().find(|(_, flag)| flag.matches(token))
    }

    /// Finds the subcommand case whose literal equals `token`.
    pub fn find_subcommand(&self, token: &str) -> Option<(usize, &SubcommandSchema)> {
        self.subcommands().find(|(_, sub)| sub.literal == token)
    }

    /// Finds the command group that has a case named `token`.
    pub fn find_group(&self, token: &str) -> Option<(usize, &GroupSchema)> {
        self.groups().find(|(_, group)| group.has_case(token))
    }

    /// Finds the parameter declared at `ordinal`.
    pub fn parameter_at(&self, ordinal: usize) -> Option<(usize, &ArgSchema)> {
        self.parameters().find(|(_, arg)| arg.ordinal == ordinal)
    }

    /// Returns `true` if any subcommand case or command group is declared.
    pub fn has_commands(&self) -> bool {
        self.subcommands().next().is_some() || self.groups().next().is_some()
    }

    /// Every case name reachable from this level, in declaration order.
    ///
    /// Direct subcommand literals and the case names of each group are
    /// listed in the order their fields are declared.
    pub fn case_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for field in &self.fields {
            match &field.kind {
                FieldKind::Subcommand(sub) => names.push(sub.literal.as_str()),
                FieldKind::Group(group) => names.extend(group.case_names()),
                FieldKind::Option(_) | FieldKind::Parameter(_) => {}
            }
        }
        names
    }

    /// Resolves a case name to the level entered after it is selected.
    ///
    /// Looks at direct subcommands first, then at the cases of each group.
    /// A case without a body yields `None` for the body.
    pub fn find_case(&self, name: &str) -> Option<&SubcommandSchema> {
        if let Some((_, sub)) = self.find_subcommand(name) {
            return Some(sub);
        }
        self.groups()
            .find_map(|(_, group)| group.schema.find_subcommand(name))
            .map(|(_, sub)| sub)
    }
}
