// zhseg-engine: the segmentation engine interface and a reference engine.
//
// The parser never talks to a concrete segmenter directly; it drives the
// `SegmentEngine` / `EngineFork` trait pair. A persistent engine instance
// holds the compiled configuration (charset, rule file, dictionaries) and
// hands out lightweight forks, one per tokenizer session. Forks share the
// persistent instance's read-only compiled data and carry their own scan
// cursor, so independent sessions can run concurrently.
//
// A fork borrows the text it scans for a caller-chosen lifetime; lexeme
// nodes are byte spans into that text and the text is never copied.
//
// `CharClassEngine` is a small built-in implementation of the pair:
// character-class segmentation with longest-match lookup over loaded text
// dictionaries. It exists so the workspace is testable and usable on its
// own; production deployments bind a full segmentation library behind the
// same traits.

pub mod charclass;
pub mod handle;
pub mod simple;

use std::path::{Path, PathBuf};

use zhseg_core::charset::Charset;
use zhseg_core::flags::{DictMode, MultiMode};

pub use handle::EngineHandle;
pub use simple::{CharClassEngine, CharClassFork};

/// Error type for engine construction and configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine could not allocate its internal state. Fatal to setup.
    #[error("failed to initialize segmentation engine")]
    InitFailed,

    /// A rule file could not be opened or read.
    #[error("cannot load rule file {path}: {reason}")]
    RuleLoad { path: PathBuf, reason: String },

    /// A dictionary file could not be opened or read.
    #[error("cannot load dictionary {path}: {reason}")]
    DictLoad { path: PathBuf, reason: String },
}

/// One lexeme node as produced by an engine's result batch.
///
/// `off` and `len` are byte positions in the buffer last sent to the fork.
/// `attr` is the engine's raw category tag; only the first byte takes part
/// in the host protocol (clamped to the 26-letter taxonomy by the session),
/// the second byte carries engine-specific refinements such as the `g` of
/// `Ng` and is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexemeNode {
    /// Byte offset within the sent buffer.
    pub off: usize,
    /// Byte length.
    pub len: usize,
    /// Raw category tag; `attr[0]` is the primary category byte.
    pub attr: [u8; 2],
}

impl LexemeNode {
    /// Create a node with a single-byte category tag.
    pub fn new(off: usize, len: usize, category: u8) -> Self {
        Self { off, len, attr: [category, 0] }
    }
}

/// The persistent side of a segmentation engine.
///
/// One instance lives for the whole process; all committed configuration is
/// applied to it through `&mut self` (callers serialize configuration
/// changes), while `fork` borrows shared and may be called concurrently
/// from any number of sessions.
pub trait SegmentEngine {
    /// The per-session fork type. `'t` is the lifetime of the text a fork
    /// is given to scan; the fork must not outlive it.
    type Fork<'t>: EngineFork<'t>;

    /// Select the charset used to decode sent buffers.
    fn set_charset(&mut self, charset: Charset);

    /// Load a segmentation rule file.
    fn set_rule(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Replace the engine's dictionary set with the given file.
    fn set_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError>;

    /// Add a further dictionary on top of the current set.
    fn add_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError>;

    /// Produce an independent per-session fork sharing this instance's
    /// compiled dictionaries and rules.
    fn fork<'t>(&self) -> Self::Fork<'t>;
}

/// The per-session side of a segmentation engine.
///
/// A fork is owned by exactly one tokenizer session. The session applies its
/// per-session overrides, sends the text once, then pulls result batches
/// until an empty batch signals exhaustion.
pub trait EngineFork<'t> {
    /// Skip punctuation lexemes in the output.
    fn set_ignore_punctuation(&mut self, ignore: bool);

    /// Segment unmatched runs with two-character duality pairing.
    fn set_duality(&mut self, duality: bool);

    /// Set the multi-result expansion mask.
    fn set_multi(&mut self, mode: MultiMode);

    /// Feed the text to scan. The fork keeps the borrow for its remaining
    /// lifetime and resets its cursor to the start.
    fn send_text(&mut self, text: &'t [u8]);

    /// Pull the next batch of lexeme nodes, scanning ahead over some prefix
    /// of the sent text. An empty batch means the text is exhausted. The
    /// batching granularity is an implementation detail.
    fn fetch_result(&mut self) -> Vec<LexemeNode>;
}
