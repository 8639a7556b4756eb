// EngineHandle: lifecycle wrapper around the one persistent engine instance.

use std::path::Path;

use zhseg_core::charset::Charset;
use zhseg_core::flags::DictMode;

use crate::{EngineError, SegmentEngine};

/// Owns the process's single persistent segmentation engine.
///
/// Committed configuration values flow through the `apply_*` methods, which
/// take `&mut self`: Rust's borrow rules therefore serialize configuration
/// writers against each other and against `fork`, which only needs `&self`
/// and may be called concurrently from independent sessions (forks share
/// nothing mutable with the persistent instance).
///
/// Shutdown is `Drop`. A fork-after-shutdown cannot be expressed: once the
/// handle is gone there is nothing left to call `fork` on.
pub struct EngineHandle<E: SegmentEngine> {
    engine: E,
}

impl<E: SegmentEngine> EngineHandle<E> {
    /// Wrap a constructed engine instance.
    ///
    /// Engine constructors report allocation failure themselves (as
    /// [`EngineError::InitFailed`]); by the time a handle exists the engine
    /// is known-good.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Apply a committed charset.
    pub fn apply_charset(&mut self, charset: Charset) {
        self.engine.set_charset(charset);
    }

    /// Apply a committed rule file path.
    pub fn apply_rule_path(&mut self, path: &Path) -> Result<(), EngineError> {
        self.engine.set_rule(path)
    }

    /// Replace the dictionary set with the given file (first list entry).
    pub fn replace_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError> {
        self.engine.set_dict(path, mode)
    }

    /// Add a further dictionary (subsequent list entries).
    pub fn add_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError> {
        self.engine.add_dict(path, mode)
    }

    /// Fork a per-session engine clone.
    pub fn fork<'t>(&self) -> E::Fork<'t> {
        self.engine.fork()
    }
}
