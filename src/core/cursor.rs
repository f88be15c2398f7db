//! Byte cursor over a finite fragment
//!
//! Uses the memchr crate for fast delimiter searching with SIMD
//! acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::memchr;

/// Position-tracked cursor for markup delimiter detection
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor over the given fragment
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Get a slice between absolute positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Find next '<' from the current position
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find the '>' closing the current tag, skipping quoted values.
    ///
    /// A '>' inside a single- or double-quoted attribute value does not
    /// terminate the tag.
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single_quote => in_double_quote = !in_double_quote,
                b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
                b'>' if !in_single_quote && !in_double_quote => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Read a tag or attribute name, advancing past it.
    ///
    /// Returns None without advancing when the current byte cannot start a
    /// name.
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;

        if start >= self.input.len() {
            return None;
        }

        if !is_name_start_char(self.input[start]) {
            return None;
        }

        self.pos += 1;

        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }

        Some(&self.input[start..self.pos])
    }
}

/// Check if byte can start a tag name
/// ASCII letters only; anything else after '<' is literal text
#[inline]
pub(crate) fn is_name_start_char(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// Check if byte can continue a tag or attribute name
/// Allows ASCII alphanumeric, hyphen, underscore, colon, and non-ASCII
#[inline]
pub(crate) fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let cursor = Cursor::new(b"hello <table>");
        assert_eq!(cursor.find_tag_start(), Some(6));
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let cursor = Cursor::new(b"<a title=\">test\">content");
        assert_eq!(cursor.find_tag_end_quoted(), Some(16));
    }

    #[test]
    fn test_read_name() {
        let mut cursor = Cursor::new(b"font-size>");
        assert_eq!(cursor.read_name(), Some(b"font-size" as &[u8]));
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn test_read_name_rejects_non_letter() {
        let mut cursor = Cursor::new(b"1col>");
        assert_eq!(cursor.read_name(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut cursor = Cursor::new(b"  \t\n hello");
        cursor.skip_whitespace();
        assert_eq!(cursor.position(), 5);
    }
}
