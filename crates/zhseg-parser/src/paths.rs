// Configuration file path resolution.
//
// Rule files and dictionaries are named by basename in the settings; the
// host maps them into its shared data directory. The mapping itself is a
// collaborator behind a trait so tests and embedders can substitute their
// own layout; the only contract is determinism.

use std::path::PathBuf;

/// Maps a (basename, extension) pair from a validated setting to a full
/// filesystem path.
pub trait ConfigPathResolver {
    fn resolve(&self, basename: &str, extension: &str) -> PathBuf;
}

/// The default layout: `<root>/tsearch_data/<basename>.<extension>`.
pub struct SharedDataResolver {
    root: PathBuf,
}

impl SharedDataResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ConfigPathResolver for SharedDataResolver {
    fn resolve(&self, basename: &str, extension: &str) -> PathBuf {
        self.root
            .join("tsearch_data")
            .join(format!("{basename}.{extension}"))
    }
}

/// Whether a basename is safe to concatenate into a shared-directory path.
///
/// Only `a-z`, `0-9`, `_` and `.` are allowed. `/` must be rejected to keep
/// access inside the data directory, `\` and `:` are risky on some
/// platforms, and uppercase would behave differently on case-sensitive and
/// case-insensitive filesystems, so the policy is deliberately tight. This
/// check runs before any resolver call.
pub fn is_safe_basename(name: &str) -> bool {
    name.bytes()
        .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.'))
}
