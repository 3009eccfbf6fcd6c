//! Help text rendering.
//!
//! Output is deterministic and follows declaration order:
//!
//! ```text
//! usage: TopCommand [-v | --verbose] [-t | --string-option <stringOption>] <command>
//!
//! Options:
//!     -v, --verbose
//!     -t, --string-option  <stringOption>
//!
//! Commands:
//!     first
//!     second
//! ```

use crate::resolver::HelpLevel;
use crate::types::{CommandSchema, FieldKind, FieldSchema, FlagSchema};

const INDENT: &str = "    ";

/// Renders help text for `schema`.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let schema = CommandSchema::new("copy")
///     .with_flag("force", FlagSchema::boolean(&["-f", "--force"]))
///     .with_arg("source", ArgSchema::new(0));
///
/// let help = render_help(&schema);
/// assert!(help.starts_with("usage: copy [-f | --force] <source>\n"));
/// ```
pub fn render_help(schema: &CommandSchema) -> String {
    render_level(&schema.name, schema)
}

/// Renders help text for the level reached by following `path` from `schema`.
///
/// Each path segment names a case selectable at the current level, either a
/// direct subcommand or a case of one of its command groups. Returns `None`
/// if a segment names no such case.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let cases = CommandSchema::new("SubCommand").with_subcommand(
///     "first",
///     SubcommandSchema::new("first").with_body(
///         CommandSchema::new("first")
///             .with_flag("some_option", FlagSchema::boolean(&["-s", "--some-option"])),
///     ),
/// );
/// let schema = CommandSchema::new("TopCommand").with_group("command", cases);
///
/// let help = render_help_for_path(&schema, &["first"]).unwrap();
/// assert!(help.starts_with("usage: TopCommand first [-s | --some-option]\n"));
/// assert!(render_help_for_path(&schema, &["third"]).is_none());
/// ```
pub fn render_help_for_path(schema: &CommandSchema, path: &[&str]) -> Option<String> {
    let empty = CommandSchema::default();
    let mut usage_name = schema.name.clone();
    let mut current = schema;

    for segment in path {
        let case = current.find_case(segment)?;
        usage_name.push(' ');
        usage_name.push_str(segment);
        current = case.body.as_deref().unwrap_or(&empty);
    }

    Some(render_level(&usage_name, current))
}

/// Renders help for a level recorded during parsing.
pub fn render_help_for_level(schema: &CommandSchema, level: &HelpLevel) -> Option<String> {
    let path: Vec<&str> = level.path.iter().map(String::as_str).collect();
    render_help_for_path(schema, &path)
}

fn render_level(usage_name: &str, schema: &CommandSchema) -> String {
    let mut out = usage_line(usage_name, schema);
    out.push('\n');

    let options: Vec<String> = schema
        .fields
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Option(flag) => Some(option_entry(field, flag)),
            _ => None,
        })
        .collect();
    push_section(&mut out, "Options:", &options);

    let mut parameters: Vec<(usize, &FieldSchema)> = schema
        .fields
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Parameter(arg) => Some((arg.ordinal, field)),
            _ => None,
        })
        .collect();
    parameters.sort_by_key(|(ordinal, _)| *ordinal);
    let arguments: Vec<String> = parameters
        .iter()
        .map(|(_, field)| with_description(format!("<{}>", field.name), field))
        .collect();
    push_section(&mut out, "Arguments:", &arguments);

    let commands: Vec<String> = case_fields(schema)
        .into_iter()
        .map(|(name, field)| with_description(name.to_string(), field))
        .collect();
    push_section(&mut out, "Commands:", &commands);

    out
}

fn usage_line(usage_name: &str, schema: &CommandSchema) -> String {
    let mut parts = vec![format!("usage: {usage_name}")];

    for field in &schema.fields {
        if let FieldKind::Option(flag) = &field.kind {
            let mut part = flag.aliases.join(" | ");
            if flag.takes_value {
                part.push_str(&format!(" <{}>", value_name(field, flag)));
            }
            parts.push(format!("[{part}]"));
        }
    }

    let mut ordinals: Vec<(usize, &str)> = schema
        .fields
        .iter()
        .filter_map(|field| match &field.kind {
            FieldKind::Parameter(arg) => Some((arg.ordinal, field.name.as_str())),
            _ => None,
        })
        .collect();
    ordinals.sort_by_key(|(ordinal, _)| *ordinal);
    parts.extend(ordinals.into_iter().map(|(_, name)| format!("<{name}>")));

    if schema.has_commands() {
        parts.push("<command>".to_string());
    }

    parts.join(" ")
}

fn option_entry(field: &FieldSchema, flag: &FlagSchema) -> String {
    let mut entry = flag.aliases.join(", ");
    if flag.takes_value {
        entry.push_str(&format!("  <{}>", value_name(field, flag)));
    }
    with_description(entry, field)
}

fn value_name<'f>(field: &'f FieldSchema, flag: &'f FlagSchema) -> &'f str {
    flag.value_name.as_deref().unwrap_or(&field.name)
}

fn with_description(mut entry: String, field: &FieldSchema) -> String {
    if let Some(desc) = &field.description {
        entry.push_str("  ");
        entry.push_str(desc);
    }
    entry
}

/// Case names with the field that declares them, in declaration order.
fn case_fields(schema: &CommandSchema) -> Vec<(&str, &FieldSchema)> {
    let mut cases = Vec::new();
    for field in &schema.fields {
        match &field.kind {
            FieldKind::Subcommand(sub) => cases.push((sub.literal.as_str(), field)),
            FieldKind::Group(group) => {
                cases.extend(group.schema.fields.iter().filter_map(|case| match &case.kind {
                    FieldKind::Subcommand(sub) => Some((sub.literal.as_str(), case)),
                    _ => None,
                }));
            }
            FieldKind::Option(_) | FieldKind::Parameter(_) => {}
        }
    }
    cases
}

fn push_section(out: &mut String, header: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(header);
    out.push('\n');
    for line in lines {
        out.push_str(INDENT);
        out.push_str(line);
        out.push('\n');
    }
}
