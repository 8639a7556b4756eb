// Tokenizer session: one pass over one borrowed buffer.
//
// The session is a cursor walk over engine result batches. It owns a forked
// engine for its lifetime and the current batch of lexeme nodes; the batch
// is released the moment its last node is consumed, never earlier and never
// twice, and the fork is released when the session drops. The input buffer
// is only ever borrowed, so a span's offset/length always refers to caller
// memory that is guaranteed to still be alive.

use std::collections::VecDeque;

use zhseg_core::flags::MultiMode;
use zhseg_core::lexeme::LexemeSpan;
use zhseg_core::lextype::clamp_category;
use zhseg_engine::{EngineFork, LexemeNode, SegmentEngine};

/// A tokenizer session over a borrowed text buffer.
///
/// Produced by [`SegParser::open_session`](crate::SegParser::open_session).
/// Drive it with [`next_lexeme`](Self::next_lexeme) until the end sentinel,
/// or through the [`Iterator`] impl. Dropping the session at any point
/// releases the fork; there is no explicit close call to get wrong.
pub struct ParserSession<'buf, E: SegmentEngine> {
    buffer: &'buf [u8],
    fork: E::Fork<'buf>,
    /// The current result batch, present only while partially consumed.
    pending: Option<VecDeque<LexemeNode>>,
    exhausted: bool,
}

impl<'buf, E: SegmentEngine> ParserSession<'buf, E> {
    /// Configure a fresh fork with the session overrides and feed it the
    /// buffer.
    pub(crate) fn start(
        mut fork: E::Fork<'buf>,
        buffer: &'buf [u8],
        punctuation_ignore: bool,
        seg_with_duality: bool,
        multi_mode: MultiMode,
    ) -> Self {
        fork.set_ignore_punctuation(punctuation_ignore);
        fork.set_duality(seg_with_duality);
        fork.set_multi(multi_mode);
        fork.send_text(buffer);
        Self {
            buffer,
            fork,
            pending: None,
            exhausted: false,
        }
    }

    /// Yield the next lexeme span, or the end sentinel once the buffer is
    /// exhausted. Calling again after the sentinel keeps returning it.
    ///
    /// The category byte is clamped into `a..=z`; anything else the engine
    /// reports becomes `x` (unknown).
    pub fn next_lexeme(&mut self) -> LexemeSpan {
        if self.exhausted {
            return LexemeSpan::end();
        }

        if self.pending.is_none() {
            let batch = self.fork.fetch_result();
            if batch.is_empty() {
                self.exhausted = true;
                return LexemeSpan::end();
            }
            self.pending = Some(VecDeque::from(batch));
        }

        let node = match self.pending.as_mut().and_then(VecDeque::pop_front) {
            Some(node) => node,
            // Unreachable: `pending` is only ever set from a non-empty
            // batch and cleared as soon as it drains.
            None => {
                self.exhausted = true;
                return LexemeSpan::end();
            }
        };

        // Release the batch as soon as it is drained, not on a later call.
        if self.pending.as_ref().is_some_and(VecDeque::is_empty) {
            self.pending = None;
        }

        LexemeSpan::new(clamp_category(node.attr[0]), node.off, node.len)
    }

    /// The buffer this session was opened with.
    pub fn buffer(&self) -> &'buf [u8] {
        self.buffer
    }

    /// The bytes of a span yielded by this session.
    pub fn lexeme_bytes(&self, span: LexemeSpan) -> &'buf [u8] {
        span.bytes_of(self.buffer)
    }
}

impl<E: SegmentEngine> Iterator for ParserSession<'_, E> {
    type Item = LexemeSpan;

    fn next(&mut self) -> Option<LexemeSpan> {
        let span = self.next_lexeme();
        if span.is_end() { None } else { Some(span) }
    }
}
