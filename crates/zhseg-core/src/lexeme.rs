// Lexeme span: the unit of tokenizer session output.

use crate::lextype::LEX_END;

/// One segmented token, expressed as a view into the session's input buffer.
///
/// The span never carries text of its own: `off` and `len` are byte
/// positions in the buffer the session was opened with, so the buffer must
/// stay alive for as long as spans into it are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexemeSpan {
    /// Category code, `b'a'..=b'z'`, or [`LEX_END`] for the end marker.
    pub category: u8,
    /// Byte offset of the lexeme within the input buffer.
    pub off: usize,
    /// Byte length of the lexeme.
    pub len: usize,
}

impl LexemeSpan {
    /// Create a span for one lexeme.
    pub fn new(category: u8, off: usize, len: usize) -> Self {
        Self { category, off, len }
    }

    /// The end-of-sequence sentinel: category 0, zero length.
    pub fn end() -> Self {
        Self { category: LEX_END, off: 0, len: 0 }
    }

    /// Whether this span is the end-of-sequence sentinel.
    pub fn is_end(&self) -> bool {
        self.category == LEX_END
    }

    /// Slice the lexeme's bytes out of the buffer it refers to.
    pub fn bytes_of<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.off..self.off + self.len]
    }
}

impl Default for LexemeSpan {
    fn default() -> Self {
        Self::end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new() {
        let s = LexemeSpan::new(b'n', 6, 5);
        assert_eq!(s.category, b'n');
        assert_eq!(s.off, 6);
        assert_eq!(s.len, 5);
        assert!(!s.is_end());
    }

    #[test]
    fn end_sentinel() {
        let s = LexemeSpan::end();
        assert_eq!(s.category, LEX_END);
        assert_eq!(s.len, 0);
        assert!(s.is_end());
    }

    #[test]
    fn default_is_end() {
        assert!(LexemeSpan::default().is_end());
    }

    #[test]
    fn bytes_of_slices_the_buffer() {
        let buf = b"hello world";
        let s = LexemeSpan::new(b'n', 6, 5);
        assert_eq!(s.bytes_of(buf), b"world");
    }
}
