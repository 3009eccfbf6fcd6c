//! Static schema validation.
//!
//! Catches schemas the resolver cannot parse deterministically: duplicate
//! aliases, ambiguous parameter ordinals, levels mixing parameters with
//! command groups, and option aliases that shadow an enclosing level's.
//!
//! # Examples
//!
//! ```
//! use command_args_core::*;
//!
//! let schema = CommandSchema::new("tool")
//!     .with_flag("verbose", FlagSchema::boolean(&["-v", "--verbose"]));
//! assert!(validate_command(&schema).is_empty());
//!
//! // Invalid: alias missing the leading dash
//! let bad = CommandSchema::new("tool")
//!     .with_flag("verbose", FlagSchema::boolean(&["v"]));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{CommandSchema, FLAG_SIGIL, FieldKind, is_flag};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("schema command cannot be empty")]
    EmptyCommandName,
    /// An option declares no alias.
    #[error("option '{0}' must define at least one alias")]
    MissingFlagName(String),
    /// Alias does not start with the flag sigil or is the sigil alone.
    #[error("invalid flag format: {0}")]
    InvalidFlag(String),
    /// Two options in the same level share an alias.
    #[error("duplicate flag in scope: {0}")]
    DuplicateFlag(String),
    /// An alias shadows one declared by an enclosing level.
    #[error("flag {flag} in '{command}' collides with an enclosing command's option")]
    AncestorFlagCollision { command: String, flag: String },
    /// Two parameters in the same level share an ordinal.
    #[error("duplicate parameter ordinal in scope: {0}")]
    DuplicateParameter(usize),
    /// Parameter ordinals skip a position.
    #[error("parameter ordinal {0} is declared without ordinal {1}")]
    ParameterGap(usize, usize),
    /// A case literal is empty or flag-shaped.
    #[error("invalid subcommand name: '{0}'")]
    InvalidSubcommand(String),
    /// Two cases reachable from the same level share a name.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A command group's nested schema declares no case.
    #[error("command group '{0}' has no cases")]
    EmptyCommandGroup(String),
    /// A level declares both positional parameters and a command group.
    #[error("command '{0}' cannot declare both parameters and a command group")]
    ParametersWithCommandGroup(String),
    /// A level declares both positional parameters and a subcommand case.
    #[error("command '{0}' cannot declare both parameters and a subcommand")]
    ParametersWithSubcommand(String),
}

/// Validates a command schema and every level nested inside it.
///
/// Returns an empty list for a valid schema. Validation stops at the first
/// problem found, so at most one error is reported.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let cases = CommandSchema::new("cases")
///     .with_subcommand("copy", SubcommandSchema::new("copy"));
/// let schema = CommandSchema::new("tool")
///     .with_arg("file", ArgSchema::new(0))
///     .with_group("command", cases);
///
/// let errors = validate_command(&schema);
/// assert_eq!(
///     errors,
///     vec![ValidationError::ParametersWithCommandGroup("tool".into())]
/// );
/// ```
pub fn validate_command(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut ancestors = Vec::new();
    validate_level(schema, &mut ancestors)
}

fn validate_level<'a>(
    schema: &'a CommandSchema,
    ancestors: &mut Vec<&'a str>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if schema.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_flags(schema, ancestors));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_parameters(schema));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_cases(schema));
    if !errors.is_empty() {
        return errors;
    }

    let depth = ancestors.len();
    ancestors.extend(
        schema
            .options()
            .flat_map(|(_, flag)| flag.aliases.iter().map(String::as_str)),
    );

    for field in &schema.fields {
        let nested = match &field.kind {
            FieldKind::Group(group) => {
                if group.case_names().next().is_none() {
                    errors.push(ValidationError::EmptyCommandGroup(field.name.clone()));
                    break;
                }
                Some(group.schema.as_ref())
            }
            FieldKind::Subcommand(sub) => sub.body.as_deref(),
            FieldKind::Option(_) | FieldKind::Parameter(_) => None,
        };
        if let Some(nested) = nested {
            errors.extend(validate_level(nested, ancestors));
            if !errors.is_empty() {
                break;
            }
        }
    }

    ancestors.truncate(depth);
    errors
}

fn validate_flags(schema: &CommandSchema, ancestors: &[&str]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for field in &schema.fields {
        let FieldKind::Option(flag) = &field.kind else {
            continue;
        };
        if flag.aliases.is_empty() {
            errors.push(ValidationError::MissingFlagName(field.name.clone()));
            return errors;
        }

        for alias in &flag.aliases {
            if !is_valid_alias(alias) {
                errors.push(ValidationError::InvalidFlag(alias.clone()));
                return errors;
            }
            if !seen.insert(alias.as_str()) {
                errors.push(ValidationError::DuplicateFlag(alias.clone()));
                return errors;
            }
            if ancestors.contains(&alias.as_str()) {
                errors.push(ValidationError::AncestorFlagCollision {
                    command: schema.name.clone(),
                    flag: alias.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

fn is_valid_alias(alias: &str) -> bool {
    is_flag(alias)
        && alias.len() > FLAG_SIGIL.len_utf8()
        && alias != "--"
        && !alias.chars().any(char::is_whitespace)
}

fn validate_parameters(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut ordinals = Vec::new();

    for (_, arg) in schema.parameters() {
        if ordinals.contains(&arg.ordinal) {
            errors.push(ValidationError::DuplicateParameter(arg.ordinal));
            return errors;
        }
        ordinals.push(arg.ordinal);
    }

    // A level with parameters has no nested levels, so at most one level on
    // any path consumes positional tokens.
    if !ordinals.is_empty() {
        if schema.groups().next().is_some() {
            errors.push(ValidationError::ParametersWithCommandGroup(
                schema.name.clone(),
            ));
            return errors;
        }
        if schema.subcommands().next().is_some() {
            errors.push(ValidationError::ParametersWithSubcommand(
                schema.name.clone(),
            ));
            return errors;
        }
    }

    ordinals.sort_unstable();
    for (expected, ordinal) in ordinals.iter().enumerate() {
        if *ordinal != expected {
            errors.push(ValidationError::ParameterGap(*ordinal, expected));
            return errors;
        }
    }

    errors
}

fn validate_cases(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for name in schema.case_names() {
        if name.trim().is_empty() || is_flag(name) {
            errors.push(ValidationError::InvalidSubcommand(name.to_string()));
            return errors;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateSubcommand(name.to_string()));
            return errors;
        }
    }

    errors
}
