//! Shared token position for one parse call.

/// Cursor over the raw tokens of one parse.
///
/// Every level of the command stack reads through the same cursor, so the
/// token index and positional ordinal only ever move forward.
#[derive(Debug)]
pub(crate) struct TokenCursor<'t> {
    tokens: &'t [String],
    index: usize,
    ordinal: usize,
}

impl<'t> TokenCursor<'t> {
    pub(crate) fn new(tokens: &'t [String]) -> Self {
        Self {
            tokens,
            index: 0,
            ordinal: 0,
        }
    }

    /// Token at the current position, without consuming it.
    pub(crate) fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    /// Consumes and returns the current token.
    pub(crate) fn next_token(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.index += 1;
        Some(token)
    }

    pub(crate) fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    pub(crate) fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub(crate) fn advance_ordinal(&mut self) {
        self.ordinal += 1;
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.index >= self.tokens.len()
    }
}
