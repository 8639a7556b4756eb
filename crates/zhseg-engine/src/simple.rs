// CharClassEngine: the bundled reference segmentation engine.
//
// Segmentation strategy:
// - whitespace is consumed silently;
// - letter runs and digit runs become one lexeme each (noun / numeral);
// - punctuation scalars become one lexeme each, dropped entirely when the
//   fork's ignore-punctuation flag is set;
// - Han runs are segmented by greedy longest match against the loaded text
//   dictionaries; characters not covered by any word fall out as unknown
//   singletons, or as two-character pairs when duality is on.
//
// Multi-result expansion: `zmain` additionally emits the first character of
// every multi-character dictionary word, `zall` every character. The `short`
// and `duality` multi bits are recorded but add no extra output in this
// engine; their semantics need the ambiguity lattice of a full segmenter.
//
// Only plain-text dictionaries are supported. A line is a word, optionally
// followed by a tab and a single-letter category; the default category is
// `n`. Compiled (.xdb) dictionaries are a production-engine format and load
// as an error here, which the parser's commit path downgrades to a warning.

use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;

use zhseg_core::charset::Charset;
use zhseg_core::flags::{DictMode, MultiMode};

use crate::charclass::{ScalarClass, next_scalar};
use crate::{EngineError, EngineFork, LexemeNode, SegmentEngine};

/// Target number of nodes per result batch. Runs are never split across
/// batches, so a batch may exceed this by the tail of its last run.
const BATCH_NODES: usize = 8;

/// Compiled dictionary data shared read-only between the persistent engine
/// and all forks.
#[derive(Debug, Default)]
struct CompiledData {
    /// Word bytes (in the engine charset) to category byte.
    words: HashMap<Box<[u8]>, u8>,
    /// Longest word length in scalars, the greedy matcher's lookahead cap.
    max_word_scalars: usize,
}

/// The persistent reference engine instance.
pub struct CharClassEngine {
    charset: Charset,
    data: Arc<CompiledData>,
}

impl CharClassEngine {
    /// Construct the engine.
    ///
    /// The reference engine has no internal allocations that can fail, so
    /// this never returns [`EngineError::InitFailed`] in practice; the
    /// signature is part of the engine contract, where construction failure
    /// is fatal to setup.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            charset: Charset::Utf8,
            data: Arc::new(CompiledData::default()),
        })
    }

    fn load_words(&self, path: &Path, mode: DictMode) -> Result<HashMap<Box<[u8]>, u8>, EngineError> {
        if !mode.contains(DictMode::TXT) {
            return Err(EngineError::DictLoad {
                path: path.to_path_buf(),
                reason: "only plain-text dictionaries are supported by the reference engine".into(),
            });
        }
        let raw = std::fs::read(path).map_err(|e| EngineError::DictLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut words = HashMap::new();
        for line in raw.split(|&b| b == b'\n') {
            let line = line.trim_ascii();
            if line.is_empty() || line[0] == b'#' {
                continue;
            }
            let (word, category) = match line.iter().position(|&b| b == b'\t') {
                Some(tab) => {
                    let cat = line[tab + 1..].trim_ascii();
                    let cat = if cat.len() == 1 && cat[0].is_ascii_lowercase() {
                        cat[0]
                    } else {
                        b'n'
                    };
                    (line[..tab].trim_ascii(), cat)
                }
                None => (line, b'n'),
            };
            if !word.is_empty() {
                words.insert(word.to_vec().into_boxed_slice(), category);
            }
        }
        Ok(words)
    }

    fn rebuild(&mut self, words: HashMap<Box<[u8]>, u8>) {
        let max_word_scalars = words
            .keys()
            .map(|w| count_scalars(w, self.charset))
            .max()
            .unwrap_or(0);
        self.data = Arc::new(CompiledData { words, max_word_scalars });
    }
}

impl SegmentEngine for CharClassEngine {
    type Fork<'t> = CharClassFork<'t>;

    fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
    }

    fn set_rule(&mut self, path: &Path) -> Result<(), EngineError> {
        // Rule semantics (name/number composition) belong to the production
        // engine; the reference engine only verifies the file is readable.
        std::fs::metadata(path).map_err(|e| EngineError::RuleLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn set_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError> {
        let words = self.load_words(path, mode)?;
        self.rebuild(words);
        Ok(())
    }

    fn add_dict(&mut self, path: &Path, mode: DictMode) -> Result<(), EngineError> {
        let extra = self.load_words(path, mode)?;
        let mut words: HashMap<Box<[u8]>, u8> = self
            .data
            .words
            .iter()
            .map(|(w, &c)| (w.clone(), c))
            .collect();
        words.extend(extra);
        self.rebuild(words);
        Ok(())
    }

    fn fork<'t>(&self) -> CharClassFork<'t> {
        CharClassFork {
            data: Arc::clone(&self.data),
            charset: self.charset,
            ignore_punctuation: false,
            duality: false,
            multi: MultiMode::NONE,
            text: None,
            pos: 0,
        }
    }
}

/// A per-session fork of [`CharClassEngine`].
///
/// Shares the compiled dictionary snapshot taken at fork time and owns its
/// scan cursor; nothing here aliases mutable engine state.
pub struct CharClassFork<'t> {
    data: Arc<CompiledData>,
    charset: Charset,
    ignore_punctuation: bool,
    duality: bool,
    multi: MultiMode,
    text: Option<&'t [u8]>,
    pos: usize,
}

impl<'t> EngineFork<'t> for CharClassFork<'t> {
    fn set_ignore_punctuation(&mut self, ignore: bool) {
        self.ignore_punctuation = ignore;
    }

    fn set_duality(&mut self, duality: bool) {
        self.duality = duality;
    }

    fn set_multi(&mut self, mode: MultiMode) {
        self.multi = mode;
    }

    fn send_text(&mut self, text: &'t [u8]) {
        self.text = Some(text);
        self.pos = 0;
    }

    fn fetch_result(&mut self) -> Vec<LexemeNode> {
        let Some(text) = self.text else {
            return Vec::new();
        };
        let mut out = Vec::new();

        while out.len() < BATCH_NODES && self.pos < text.len() {
            let start = self.pos;
            let scalar = next_scalar(text, start, self.charset);
            match scalar.class {
                ScalarClass::Whitespace => {
                    self.pos += scalar.len;
                }
                ScalarClass::Punctuation => {
                    self.pos += scalar.len;
                    if !self.ignore_punctuation {
                        out.push(LexemeNode::new(start, scalar.len, b'w'));
                    }
                }
                ScalarClass::Letter => {
                    let len = self.run_len(text, start, ScalarClass::Letter);
                    self.pos += len;
                    out.push(LexemeNode::new(start, len, b'n'));
                }
                ScalarClass::Digit => {
                    let len = self.run_len(text, start, ScalarClass::Digit);
                    self.pos += len;
                    out.push(LexemeNode::new(start, len, b'm'));
                }
                ScalarClass::Unknown => {
                    let len = self.run_len(text, start, ScalarClass::Unknown);
                    self.pos += len;
                    out.push(LexemeNode::new(start, len, b'x'));
                }
                ScalarClass::Han => {
                    let scalars = self.han_run(text, start);
                    self.pos = {
                        let (off, len) = scalars[scalars.len() - 1];
                        off + len
                    };
                    self.segment_han(text, &scalars, &mut out);
                }
            }
        }
        out
    }
}

impl CharClassFork<'_> {
    /// Byte length of the run of `class` scalars starting at `start`.
    fn run_len(&self, text: &[u8], start: usize, class: ScalarClass) -> usize {
        let mut pos = start;
        while pos < text.len() {
            let s = next_scalar(text, pos, self.charset);
            if s.class != class {
                break;
            }
            pos += s.len;
        }
        pos - start
    }

    /// Collect the (offset, byte length) of each scalar in the Han run
    /// starting at `start`. The run is non-empty by construction.
    fn han_run(&self, text: &[u8], start: usize) -> Vec<(usize, usize)> {
        let mut scalars = Vec::new();
        let mut pos = start;
        while pos < text.len() {
            let s = next_scalar(text, pos, self.charset);
            if s.class != ScalarClass::Han {
                break;
            }
            scalars.push((pos, s.len));
            pos += s.len;
        }
        scalars
    }

    /// Greedy longest-match segmentation of one Han run.
    fn segment_han(&self, text: &[u8], scalars: &[(usize, usize)], out: &mut Vec<LexemeNode>) {
        let mut i = 0;
        while i < scalars.len() {
            if let Some((count, category)) = self.longest_match(text, scalars, i) {
                let off = scalars[i].0;
                let last = scalars[i + count - 1];
                let len = last.0 + last.1 - off;
                out.push(LexemeNode::new(off, len, category));
                if count > 1 {
                    self.expand_multi(scalars, i, count, category, out);
                }
                i += count;
            } else if self.duality && i + 1 < scalars.len() && self.longest_match(text, scalars, i + 1).is_none() {
                // Two adjacent uncovered characters pair up.
                let off = scalars[i].0;
                let next = scalars[i + 1];
                out.push(LexemeNode::new(off, next.0 + next.1 - off, b'n'));
                i += 2;
            } else {
                let (off, len) = scalars[i];
                out.push(LexemeNode::new(off, len, b'x'));
                i += 1;
            }
        }
    }

    /// Longest dictionary word starting at scalar `i`, as (scalar count,
    /// category). Single-scalar words count as matches.
    fn longest_match(&self, text: &[u8], scalars: &[(usize, usize)], i: usize) -> Option<(usize, u8)> {
        let cap = self.data.max_word_scalars.min(scalars.len() - i);
        for count in (1..=cap).rev() {
            let off = scalars[i].0;
            let last = scalars[i + count - 1];
            let candidate = &text[off..last.0 + last.1];
            if let Some(&category) = self.data.words.get(candidate) {
                return Some((count, category));
            }
        }
        None
    }

    /// Emit the sub-elements of a matched word per the multi-result mask.
    fn expand_multi(
        &self,
        scalars: &[(usize, usize)],
        i: usize,
        count: usize,
        category: u8,
        out: &mut Vec<LexemeNode>,
    ) {
        if self.multi.contains(MultiMode::ZALL) {
            for &(off, len) in &scalars[i..i + count] {
                out.push(LexemeNode::new(off, len, category));
            }
        } else if self.multi.contains(MultiMode::ZMAIN) {
            let (off, len) = scalars[i];
            out.push(LexemeNode::new(off, len, category));
        }
    }
}

fn count_scalars(bytes: &[u8], charset: Charset) -> usize {
    let mut pos = 0;
    let mut count = 0;
    while pos < bytes.len() {
        pos += next_scalar(bytes, pos, charset).len;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn drain(fork: &mut CharClassFork<'_>) -> Vec<LexemeNode> {
        let mut all = Vec::new();
        loop {
            let batch = fork.fetch_result();
            if batch.is_empty() {
                return all;
            }
            all.extend(batch);
        }
    }

    fn write_dict(dir: &tempfile::TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn ascii_words_and_numbers() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        fork.send_text(b"hello 42 world");
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 3);
        assert_eq!((nodes[0].off, nodes[0].len, nodes[0].attr[0]), (0, 5, b'n'));
        assert_eq!((nodes[1].off, nodes[1].len, nodes[1].attr[0]), (6, 2, b'm'));
        assert_eq!((nodes[2].off, nodes[2].len, nodes[2].attr[0]), (9, 5, b'n'));
    }

    #[test]
    fn punctuation_emitted_then_ignored() {
        let engine = CharClassEngine::new().unwrap();

        let mut fork = engine.fork();
        fork.send_text(b"a,b");
        assert_eq!(drain(&mut fork).len(), 3);

        let mut fork = engine.fork();
        fork.set_ignore_punctuation(true);
        fork.send_text(b"a,b");
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.attr[0] == b'n'));
    }

    #[test]
    fn fetch_before_send_is_empty() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        assert!(fork.fetch_result().is_empty());
    }

    #[test]
    fn batches_cover_the_whole_text() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        let text = b"a b c d e f g h i j k l m n o p";
        fork.send_text(text);
        let first = fork.fetch_result();
        assert_eq!(first.len(), BATCH_NODES);
        let rest = drain(&mut fork);
        assert_eq!(first.len() + rest.len(), 16);
    }

    #[test]
    fn exhausted_fork_stays_empty() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        fork.send_text(b"x");
        assert_eq!(drain(&mut fork).len(), 1);
        assert!(fork.fetch_result().is_empty());
        assert!(fork.fetch_result().is_empty());
    }

    #[test]
    fn han_without_dictionary_is_unknown_singletons() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        let text = "中文".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.attr[0] == b'x' && n.len == 3));
    }

    #[test]
    fn dictionary_longest_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir, "words.txt", &["中文\tn", "中\tn", "分词\tv"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&dict, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        let text = "中文分词".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert_eq!((nodes[0].off, nodes[0].len, nodes[0].attr[0]), (0, 6, b'n'));
        assert_eq!((nodes[1].off, nodes[1].len, nodes[1].attr[0]), (6, 6, b'v'));
    }

    #[test]
    fn add_dict_merges_over_set_dict() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_dict(&dir, "base.txt", &["中文"]);
        let extra = write_dict(&dir, "extra.txt", &["分词\tv"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&base, DictMode::TXT).unwrap();
        engine.add_dict(&extra, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        let text = "中文分词".as_bytes();
        fork.send_text(text);
        assert_eq!(drain(&mut fork).len(), 2);
    }

    #[test]
    fn set_dict_replaces_previous_words() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_dict(&dir, "base.txt", &["中文"]);
        let other = write_dict(&dir, "other.txt", &["分词"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&base, DictMode::TXT).unwrap();
        engine.set_dict(&other, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        let text = "中文".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        // "中文" fell out of the dictionary with the replace.
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.attr[0] == b'x'));
    }

    #[test]
    fn missing_dictionary_file_is_an_error() {
        let mut engine = CharClassEngine::new().unwrap();
        let err = engine.set_dict(Path::new("/nonexistent/words.txt"), DictMode::TXT);
        assert!(matches!(err, Err(EngineError::DictLoad { .. })));
    }

    #[test]
    fn xdb_dictionaries_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.xdb");
        std::fs::write(&path, b"binary").unwrap();

        let mut engine = CharClassEngine::new().unwrap();
        let err = engine.add_dict(&path, DictMode::XDB);
        assert!(matches!(err, Err(EngineError::DictLoad { .. })));
    }

    #[test]
    fn duality_pairs_uncovered_characters() {
        let engine = CharClassEngine::new().unwrap();
        let mut fork = engine.fork();
        fork.set_duality(true);
        let text = "中文分".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert_eq!((nodes[0].off, nodes[0].len), (0, 6));
        assert_eq!((nodes[1].off, nodes[1].len), (6, 3));
    }

    #[test]
    fn zall_emits_word_elements() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir, "words.txt", &["中文\tn"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&dict, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        fork.set_multi(MultiMode::ZALL);
        let text = "中文".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        // The word plus both of its characters.
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].len, 6);
        assert_eq!(nodes[1].len, 3);
        assert_eq!(nodes[2].len, 3);
    }

    #[test]
    fn zmain_emits_first_element_only() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir, "words.txt", &["中文\tn"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&dict, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        fork.set_multi(MultiMode::ZMAIN);
        let text = "中文".as_bytes();
        fork.send_text(text);
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].len, 3);
        assert_eq!(nodes[1].off, 0);
    }

    #[test]
    fn gbk_text_segments_by_byte_pairs() {
        let mut engine = CharClassEngine::new().unwrap();
        engine.set_charset(Charset::Gbk);
        let mut fork = engine.fork();
        let text = [0xD6, 0xD0, 0xCE, 0xC4]; // two GBK Han units
        fork.send_text(&text);
        let nodes = drain(&mut fork);
        assert_eq!(nodes.len(), 2);
        assert_eq!((nodes[0].off, nodes[0].len), (0, 2));
        assert_eq!((nodes[1].off, nodes[1].len), (2, 2));
    }

    #[test]
    fn dictionary_comments_and_blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let dict = write_dict(&dir, "words.txt", &["# comment", "", "中文"]);

        let mut engine = CharClassEngine::new().unwrap();
        engine.set_dict(&dict, DictMode::TXT).unwrap();

        let mut fork = engine.fork();
        let text = "中文".as_bytes();
        fork.send_text(text);
        assert_eq!(drain(&mut fork).len(), 1);
    }
}
