// Configuration compiler: validate-then-commit for the four parser settings.
//
// Each setting follows the same two-phase protocol. The `check_*` functions
// are pure: they take the raw user string and either produce a compiled
// value or an `InvalidOption` error, without touching engine state. The
// `SegParser::set_*` methods run the check and, only on success, commit the
// compiled value to the engine handle. One bad entry fails the entire
// setting, so a failed set leaves the previously committed state in place.
//
// The commit phase for dictionaries is deliberately more tolerant than its
// validation: an entry the engine cannot load is logged as a warning and
// skipped while the remaining entries are still applied. Charset and rule
// commits have no such tolerance.

use std::path::PathBuf;

use zhseg_core::charset::Charset;
use zhseg_core::flags::{DictMode, MultiMode};
use zhseg_engine::{EngineError, EngineHandle, SegmentEngine};

use crate::paths::{ConfigPathResolver, is_safe_basename};
use crate::session::ParserSession;

/// Configuration errors, surfaced synchronously at validation or commit.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A user-supplied setting string failed validation. Carries the
    /// offending value. Nothing was applied.
    #[error("invalid configuration value: \"{0}\"")]
    InvalidOption(String),

    /// The engine rejected a committed value (rule file or charset path;
    /// dictionary load failures are downgraded to warnings instead).
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One compiled dictionary list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub path: PathBuf,
    pub mode: DictMode,
}

/// Validate a charset setting. Accepts `gbk` or `utf8`, case-insensitively.
pub fn check_charset(input: &str) -> Result<Charset, ConfigError> {
    Charset::from_name(input).ok_or_else(|| ConfigError::InvalidOption(input.to_string()))
}

/// Validate a rule-file setting.
///
/// `"none"` compiles to `None` (keep the engine default). Anything else
/// must end in `.ini` (case-insensitive) and have a basename within the
/// safe character set; the basename check runs before the resolver is
/// consulted.
pub fn check_rules(
    input: &str,
    resolver: &dyn ConfigPathResolver,
) -> Result<Option<PathBuf>, ConfigError> {
    if input == "none" {
        return Ok(None);
    }
    let Some((basename, extension)) = input.rsplit_once('.') else {
        return Err(ConfigError::InvalidOption(input.to_string()));
    };
    if !extension.eq_ignore_ascii_case("ini") {
        return Err(ConfigError::InvalidOption(input.to_string()));
    }
    if !is_safe_basename(basename) {
        return Err(ConfigError::InvalidOption(input.to_string()));
    }
    Ok(Some(resolver.resolve(basename, extension)))
}

/// Validate a dictionary-list setting.
///
/// `"none"` and the empty string compile to an empty list. Otherwise the
/// value is a comma-separated list of file names whose final four characters
/// are `.txt` (text format) or `.xdb` (compiled format), case-insensitively.
/// When `in_memory` is set, the in-memory bit is ORed into every entry.
/// Any bad entry fails the whole list.
pub fn check_extra_dicts(
    input: &str,
    in_memory: bool,
    resolver: &dyn ConfigPathResolver,
) -> Result<Vec<DictEntry>, ConfigError> {
    if input == "none" || input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let base_mode = if in_memory { DictMode::MEM } else { DictMode::NONE };

    let mut entries = Vec::new();
    for item in input.split(',') {
        let item = item.trim();
        // The suffix is 4 ASCII bytes; a split point inside a multi-byte
        // character means the name cannot end in a valid suffix.
        if item.len() < 4 || !item.is_char_boundary(item.len() - 4) {
            return Err(ConfigError::InvalidOption(item.to_string()));
        }
        let (basename, suffix) = item.split_at(item.len() - 4);
        let mode = if suffix.eq_ignore_ascii_case(".txt") {
            base_mode | DictMode::TXT
        } else if suffix.eq_ignore_ascii_case(".xdb") {
            base_mode | DictMode::XDB
        } else {
            return Err(ConfigError::InvalidOption(item.to_string()));
        };
        // The extension without its dot, original case preserved.
        let extension = &suffix[1..];
        entries.push(DictEntry {
            path: resolver.resolve(basename, extension),
            mode,
        });
    }
    Ok(entries)
}

/// Validate a multi-mode setting.
///
/// `"none"` and the empty string compile to the empty mask; otherwise a
/// comma-separated list of keywords from `short`, `duality`, `zmain`, `zall`
/// (case-insensitive) is folded together with OR. An unrecognized keyword
/// fails the whole value.
pub fn check_multi_mode(input: &str) -> Result<MultiMode, ConfigError> {
    if input == "none" || input.trim().is_empty() {
        return Ok(MultiMode::NONE);
    }
    let mut mode = MultiMode::NONE;
    for item in input.split(',') {
        let item = item.trim();
        if item.eq_ignore_ascii_case("short") {
            mode |= MultiMode::SHORT;
        } else if item.eq_ignore_ascii_case("duality") {
            mode |= MultiMode::DUALITY;
        } else if item.eq_ignore_ascii_case("zmain") {
            mode |= MultiMode::ZMAIN;
        } else if item.eq_ignore_ascii_case("zall") {
            mode |= MultiMode::ZALL;
        } else {
            return Err(ConfigError::InvalidOption(item.to_string()));
        }
    }
    Ok(mode)
}

/// The configured parser: the persistent engine handle plus the session
/// flags layered on top of it.
///
/// Configuration changes go through `&mut self` and therefore cannot race
/// with `open_session`, which borrows shared; any number of sessions may be
/// open at once.
pub struct SegParser<E: SegmentEngine> {
    handle: EngineHandle<E>,
    resolver: Box<dyn ConfigPathResolver>,
    punctuation_ignore: bool,
    seg_with_duality: bool,
    dict_in_memory: bool,
    multi_mode: MultiMode,
}

impl<E: SegmentEngine> SegParser<E> {
    /// Wrap a freshly constructed engine.
    ///
    /// The engine arrives already initialized; construction failure is the
    /// engine constructor's fatal `InitFailed` and never reaches here.
    pub fn new(engine: E, resolver: Box<dyn ConfigPathResolver>) -> Self {
        Self {
            handle: EngineHandle::new(engine),
            resolver,
            punctuation_ignore: false,
            seg_with_duality: false,
            dict_in_memory: false,
            multi_mode: MultiMode::NONE,
        }
    }

    /// Validate and commit a charset setting.
    pub fn set_charset(&mut self, input: &str) -> Result<(), ConfigError> {
        let charset = check_charset(input)?;
        self.handle.apply_charset(charset);
        Ok(())
    }

    /// Validate and commit a rule-file setting. `"none"` commits nothing.
    pub fn set_rules(&mut self, input: &str) -> Result<(), ConfigError> {
        let compiled = check_rules(input, self.resolver.as_ref())?;
        if let Some(path) = compiled {
            self.handle.apply_rule_path(&path)?;
        }
        Ok(())
    }

    /// Validate and commit a dictionary-list setting.
    ///
    /// The first entry replaces the engine's dictionary set, subsequent
    /// entries are added on top. An entry the engine fails to load is
    /// logged and skipped; the remaining entries are still applied.
    pub fn set_extra_dicts(&mut self, input: &str) -> Result<(), ConfigError> {
        let entries = check_extra_dicts(input, self.dict_in_memory, self.resolver.as_ref())?;
        for (i, entry) in entries.iter().enumerate() {
            let applied = if i == 0 {
                self.handle.replace_dict(&entry.path, entry.mode)
            } else {
                self.handle.add_dict(&entry.path, entry.mode)
            };
            if let Err(err) = applied {
                tracing::warn!(
                    path = %entry.path.display(),
                    error = %err,
                    "failed to load extra dictionary, skipping"
                );
            }
        }
        Ok(())
    }

    /// Validate and commit a multi-mode setting. Takes effect for sessions
    /// opened after the commit.
    pub fn set_multi_mode(&mut self, input: &str) -> Result<(), ConfigError> {
        self.multi_mode = check_multi_mode(input)?;
        Ok(())
    }

    /// Skip punctuation lexemes in subsequently opened sessions.
    pub fn set_punctuation_ignore(&mut self, value: bool) {
        self.punctuation_ignore = value;
    }

    /// Segment with two-character duality in subsequently opened sessions.
    pub fn set_seg_with_duality(&mut self, value: bool) {
        self.seg_with_duality = value;
    }

    /// OR the in-memory bit into entries of subsequent dictionary compiles.
    /// Does not affect dictionaries already loaded.
    pub fn set_dict_in_memory(&mut self, value: bool) {
        self.dict_in_memory = value;
    }

    /// The currently committed multi-mode mask.
    pub fn multi_mode(&self) -> MultiMode {
        self.multi_mode
    }

    /// Open a tokenizer session over `buffer`.
    ///
    /// The buffer is borrowed for the session's whole lifetime; every span
    /// the session yields indexes into it.
    pub fn open_session<'buf>(&self, buffer: &'buf [u8]) -> ParserSession<'buf, E> {
        ParserSession::start(
            self.handle.fork(),
            buffer,
            self.punctuation_ignore,
            self.seg_with_duality,
            self.multi_mode,
        )
    }
}
