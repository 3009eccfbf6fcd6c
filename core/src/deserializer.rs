//! Parse-call driver shared by every level of a nested command.
//!
//! A [`Deserializer`] owns the token cursor, the command stack, the skip
//! buffer and the help collector for exactly one parse. Builders drive it
//! level by level:
//!
//! ```
//! use command_args_core::*;
//!
//! let schema = CommandSchema::new("tool")
//!     .with_flag("output", FlagSchema::with_value(&["-o"]));
//! let tokens = vec!["-o".to_string(), "-v".to_string()];
//!
//! let mut de = Deserializer::new(&tokens, ParserConfig::without_help());
//! de.open(&schema);
//! assert_eq!(de.next_field().unwrap(), Resolution::Field(0));
//! // The value token is taken verbatim, even though it looks like a flag.
//! assert_eq!(de.read_value().unwrap(), ArgValue::Text("-v".into()));
//! assert_eq!(de.next_field().unwrap(), Resolution::EndOfType);
//! de.close().unwrap();
//! ```

use tracing::trace;

use crate::config::ParserConfig;
use crate::cursor::TokenCursor;
use crate::error::{Result, SyntaxError};
use crate::resolver::{HelpCollector, HelpLevel, ParseContext, Pending, Resolver, SkipBuffer, Step};
use crate::types::CommandSchema;

/// Result of asking the active level for its next field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The field at this index of the active schema was selected.
    Field(usize),
    /// The active level has no further fields to resolve.
    EndOfType,
}

/// Value of a selected option or parameter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// A boolean switch that was present.
    Flag(bool),
    /// A token taken verbatim.
    Text(String),
}

impl ArgValue {
    /// Returns the switch state, or `None` for text values.
    pub fn into_flag(self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text, or `None` for switches.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value),
            Self::Flag(_) => None,
        }
    }
}

#[derive(Debug)]
struct Selected {
    field: String,
    pending: Option<Pending>,
}

/// Token consumption state for one parse call.
#[derive(Debug)]
pub struct Deserializer<'a> {
    cursor: TokenCursor<'a>,
    config: ParserConfig,
    stack: Vec<Resolver<'a>>,
    skipped: SkipBuffer,
    help: HelpCollector,
    selected: Option<Selected>,
}

impl<'a> Deserializer<'a> {
    /// Creates a deserializer over `tokens` with an empty command stack.
    pub fn new(tokens: &'a [String], config: ParserConfig) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            config,
            stack: Vec::new(),
            skipped: SkipBuffer::default(),
            help: HelpCollector::default(),
            selected: None,
        }
    }

    /// Pushes a new level for `command`; it becomes the active level.
    pub fn open(&mut self, command: &'a CommandSchema) {
        trace!(command = %command.name, depth = self.stack.len(), "Opening command level");
        self.stack.push(Resolver::new(command));
    }

    /// Number of open levels.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resolves the next field of the active level.
    ///
    /// A value token left unread by the previous option is consumed first,
    /// so it is never scanned as a flag or command literal.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnexpectedArgument`] when a token matches no
    /// field of the active level and no option of any enclosing level.
    pub fn next_field(&mut self) -> Result<Resolution> {
        self.settle()?;

        let Some((top, ancestors)) = self.stack.split_last_mut() else {
            return Ok(Resolution::EndOfType);
        };
        let mut ctx = ParseContext {
            cursor: &mut self.cursor,
            skipped: &mut self.skipped,
            help: &mut self.help,
            config: &self.config,
        };

        match top.resolve(&mut ctx, ancestors)? {
            Step::Field { index, pending } => {
                let command = top.command();
                let field = command
                    .field(index)
                    .map(|f| f.name.clone())
                    .unwrap_or_default();
                trace!(command = %command.name, field = %field, "Selected field");
                self.selected = Some(Selected { field, pending });
                Ok(Resolution::Field(index))
            }
            Step::EndOfType => Ok(Resolution::EndOfType),
        }
    }

    /// Reads the value of the option or parameter just selected.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::MissingValue`] if a value-taking option was the
    /// last token, or [`SyntaxError::NoPendingValue`] if the selected field
    /// is a subcommand or group.
    pub fn read_value(&mut self) -> Result<ArgValue> {
        let Some(selected) = self.selected.take() else {
            return Err(SyntaxError::NoPendingValue(String::new()));
        };
        match selected.pending {
            Some(Pending::Flag) => Ok(ArgValue::Flag(true)),
            Some(Pending::Value(value)) => Ok(ArgValue::Text(value)),
            Some(Pending::NextToken { flag }) => self
                .cursor
                .next_token()
                .map(|token| ArgValue::Text(token.to_string()))
                .ok_or(SyntaxError::MissingValue(flag)),
            None => Err(SyntaxError::NoPendingValue(selected.field)),
        }
    }

    /// Discards the value of the field just selected.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::MissingValue`] if a value-taking option was the
    /// last token.
    pub fn skip_value(&mut self) -> Result<()> {
        self.settle()
    }

    /// Pops the active level.
    ///
    /// Closing the outermost level is the end of the parse: any token left
    /// over, or any deferred option no level claimed, is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnexpectedArgument`] citing the first leftover
    /// token or unclaimed option.
    pub fn close(&mut self) -> Result<()> {
        self.settle()?;
        if let Some(level) = self.stack.pop() {
            trace!(command = %level.command().name, depth = self.stack.len(), "Closing command level");
        }
        if !self.stack.is_empty() {
            return Ok(());
        }
        if let Some(token) = self.cursor.peek() {
            return Err(SyntaxError::UnexpectedArgument(token.to_string()));
        }
        match self.skipped.first() {
            Some(entry) => Err(SyntaxError::UnexpectedArgument(entry.flag.clone())),
            None => Ok(()),
        }
    }

    /// Help requests collected so far.
    pub fn help_levels(&self) -> &[HelpLevel] {
        self.help.levels()
    }

    /// Consumes the deserializer, returning the collected help requests.
    pub fn into_help_levels(self) -> Vec<HelpLevel> {
        self.help.into_levels()
    }

    fn settle(&mut self) -> Result<()> {
        if let Some(Selected {
            pending: Some(Pending::NextToken { flag }),
            ..
        }) = self.selected.take()
        {
            if self.cursor.is_exhausted() {
                return Err(SyntaxError::MissingValue(flag));
            }
            self.cursor.advance();
        }
        Ok(())
    }
}
