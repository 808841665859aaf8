//! Backtracking cursor over a declaration string

use regex::{Captures, Regex};

/// A saved cursor position, restored with [`Cursor::reset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark(usize);

/// Byte cursor over a declaration with anchored regex matching
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Unconsumed input
    pub(crate) fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub(crate) fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Move forward by `len` bytes
    pub(crate) fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.text.len());
    }

    /// Consume and return everything that is left
    pub(crate) fn read_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.text.len();
        rest
    }

    /// Match `re` starting exactly at the cursor, with captures
    ///
    /// The whole text is searched so that `\b` sees the character before the cursor.
    pub(crate) fn captures(&mut self, re: &Regex) -> Option<Captures<'a>> {
        let caps = re.captures_at(self.text, self.pos)?;
        let whole = caps.get(0)?;
        if whole.start() != self.pos {
            return None;
        }
        self.pos = whole.end();
        Some(caps)
    }

    /// Match `re` starting exactly at the cursor
    pub(crate) fn match_re(&mut self, re: &Regex) -> Option<&'a str> {
        let found = re.find_at(self.text, self.pos)?;
        if found.start() != self.pos {
            return None;
        }
        self.pos = found.end();
        Some(found.as_str())
    }

    pub(crate) fn skip_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Skip `word` only if it stands alone (word boundaries on both sides)
    pub(crate) fn skip_word(&mut self, word: &str) -> bool {
        if !self.rest().starts_with(word) {
            return false;
        }
        let boundary_before = self.text[..self.pos]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let boundary_after = self.text[self.pos + word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));
        if boundary_before && boundary_after {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, returning true if any was consumed
    pub(crate) fn skip_ws(&mut self) -> bool {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        self.pos += skipped;
        skipped > 0
    }
}
