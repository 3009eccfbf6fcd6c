//! Per-level field resolution.
//!
//! Each open command level owns a [`Resolver`]. A resolver scans forward
//! through the shared token cursor, matching tokens against its own fields.
//! Option tokens it does not know but an enclosing level does are moved to
//! the skip buffer together with their value token. Once the tokens run out
//! the resolver drains that buffer, claiming the entries that belong to it.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::cursor::TokenCursor;
use crate::error::{Result, SyntaxError};
use crate::types::{CommandSchema, FlagSchema, is_flag};

/// A help flag observed while parsing.
///
/// `path` lists the case names selected on the way down to the level that
/// saw the flag, so the help for exactly that level can be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpLevel {
    /// Name of the command level that saw the help flag.
    pub command: String,
    /// Case names selected from the root down to that level.
    pub path: Vec<String>,
}

/// Option token deferred to an enclosing level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkippedOption {
    pub(crate) flag: String,
    pub(crate) value: Option<String>,
}

/// Insertion-ordered queue of options not yet claimed by any level.
#[derive(Debug, Default)]
pub(crate) struct SkipBuffer {
    entries: Vec<SkippedOption>,
}

impl SkipBuffer {
    pub(crate) fn push(&mut self, entry: SkippedOption) {
        self.entries.push(entry);
    }

    /// Removes the first entry matching one of `command`'s options.
    pub(crate) fn claim(&mut self, command: &CommandSchema) -> Option<(usize, SkippedOption)> {
        let (position, index) = self
            .entries
            .iter()
            .enumerate()
            .find_map(|(pos, entry)| command.find_option(&entry.flag).map(|(index, _)| (pos, index)))?;
        Some((index, self.entries.remove(position)))
    }

    pub(crate) fn first(&self) -> Option<&SkippedOption> {
        self.entries.first()
    }
}

/// Levels at which a help flag was seen, in the order they were seen.
#[derive(Debug, Default)]
pub(crate) struct HelpCollector {
    levels: Vec<HelpLevel>,
}

impl HelpCollector {
    pub(crate) fn record(&mut self, level: HelpLevel) {
        self.levels.push(level);
    }

    pub(crate) fn levels(&self) -> &[HelpLevel] {
        &self.levels
    }

    pub(crate) fn into_levels(self) -> Vec<HelpLevel> {
        self.levels
    }
}

/// How the value of a selected field is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Pending {
    /// Boolean switch, synthesized as `true`.
    Flag,
    /// The token after the option; read verbatim by the next read step.
    NextToken { flag: String },
    /// Already captured (positional token, or a value deferred with its flag).
    Value(String),
}

/// Outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Field {
        index: usize,
        pending: Option<Pending>,
    },
    EndOfType,
}

/// Shared per-parse state every resolver works against.
pub(crate) struct ParseContext<'c, 't> {
    pub(crate) cursor: &'c mut TokenCursor<'t>,
    pub(crate) skipped: &'c mut SkipBuffer,
    pub(crate) help: &'c mut HelpCollector,
    pub(crate) config: &'c ParserConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Draining,
}

/// Field-matching state machine for one command level.
#[derive(Debug)]
pub(crate) struct Resolver<'a> {
    command: &'a CommandSchema,
    state: State,
    // Set once a subcommand or group case was selected at this level.
    dispatched: bool,
    case: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(command: &'a CommandSchema) -> Self {
        Self {
            command,
            state: State::Scanning,
            dispatched: false,
            case: None,
        }
    }

    pub(crate) fn command(&self) -> &'a CommandSchema {
        self.command
    }

    /// Finds the next field of this level, or reports the end of the type.
    ///
    /// `ancestors` are the enclosing levels, outermost first.
    pub(crate) fn resolve(
        &mut self,
        ctx: &mut ParseContext<'_, '_>,
        ancestors: &[Resolver<'a>],
    ) -> Result<Step> {
        loop {
            if self.state == State::Draining {
                return Ok(self.drain(ctx.skipped));
            }

            let Some(token) = ctx.cursor.peek() else {
                trace!(command = %self.command.name, "Tokens exhausted, draining deferred options");
                self.state = State::Draining;
                continue;
            };

            if ctx.config.handle_help && ctx.config.is_help_flag(token) {
                let path = ancestors
                    .iter()
                    .chain(std::iter::once(&*self))
                    .filter_map(|level| level.case)
                    .map(String::from)
                    .collect();
                debug!(command = %self.command.name, token, "Help requested");
                ctx.help.record(HelpLevel {
                    command: self.command.name.clone(),
                    path,
                });
                ctx.cursor.advance();
                continue;
            }

            if let Some(step) = self.match_field(token, ctx.cursor) {
                return Ok(step);
            }

            if is_flag(token) && defer_to_ancestor(token, ctx, ancestors)? {
                continue;
            }

            debug!(command = %self.command.name, token, "Unexpected argument");
            return Err(SyntaxError::UnexpectedArgument(token.to_string()));
        }
    }

    fn match_field(&mut self, token: &str, cursor: &mut TokenCursor<'_>) -> Option<Step> {
        let command = self.command;

        if is_flag(token) {
            let (index, flag) = command.find_option(token)?;
            cursor.advance();
            let pending = if flag.takes_value {
                Pending::NextToken {
                    flag: token.to_string(),
                }
            } else {
                Pending::Flag
            };
            return Some(Step::Field {
                index,
                pending: Some(pending),
            });
        }

        if !self.dispatched {
            if let Some((index, sub)) = command.find_subcommand(token) {
                cursor.advance();
                self.dispatched = true;
                self.case = Some(sub.literal.as_str());
                return Some(Step::Field {
                    index,
                    pending: None,
                });
            }

            // The literal stays put; the nested level matches it as its own case.
            if let Some((index, _)) = command.find_group(token) {
                self.dispatched = true;
                return Some(Step::Field {
                    index,
                    pending: None,
                });
            }
        }

        let (index, _) = command.parameter_at(cursor.ordinal())?;
        cursor.advance();
        cursor.advance_ordinal();
        Some(Step::Field {
            index,
            pending: Some(Pending::Value(token.to_string())),
        })
    }

    fn drain(&self, skipped: &mut SkipBuffer) -> Step {
        match skipped.claim(self.command) {
            Some((index, entry)) => {
                debug!(
                    command = %self.command.name,
                    flag = %entry.flag,
                    "Claimed deferred option"
                );
                let pending = match entry.value {
                    Some(value) => Pending::Value(value),
                    None => Pending::Flag,
                };
                Step::Field {
                    index,
                    pending: Some(pending),
                }
            }
            None => Step::EndOfType,
        }
    }
}

/// Moves `token` (and its value, if it takes one) to the skip buffer when an
/// enclosing level declares it. Returns `false` if no enclosing level does.
fn defer_to_ancestor(
    token: &str,
    ctx: &mut ParseContext<'_, '_>,
    ancestors: &[Resolver<'_>],
) -> Result<bool> {
    let Some((owner, flag)) = find_ancestor_option(token, ancestors) else {
        return Ok(false);
    };

    ctx.cursor.advance();
    let value = if flag.takes_value {
        let value = ctx
            .cursor
            .next_token()
            .ok_or_else(|| SyntaxError::MissingValue(token.to_string()))?;
        Some(value.to_string())
    } else {
        None
    };

    debug!(
        token,
        owner,
        option = flag.canonical_name(),
        "Deferring option to enclosing command"
    );
    ctx.skipped.push(SkippedOption {
        flag: token.to_string(),
        value,
    });
    Ok(true)
}

fn find_ancestor_option<'r>(
    token: &str,
    ancestors: &'r [Resolver<'_>],
) -> Option<(&'r str, &'r FlagSchema)> {
    ancestors.iter().rev().find_map(|level| {
        level
            .command
            .find_option(token)
            .map(|(_, flag)| (level.command.name.as_str(), flag))
    })
}
