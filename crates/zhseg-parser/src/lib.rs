// zhseg-parser: the tokenizer session protocol and its configuration layer.
//
// Two halves:
// - `config`: validates user-supplied settings (charset, rule file,
//   dictionary list, multi mode) into compiled values and commits them to
//   the persistent engine, strictly in that order. Validation is pure;
//   nothing touches engine state until a whole setting has validated.
// - `session`: the per-text state machine. A session forks the persistent
//   engine, feeds it one borrowed buffer, and yields lexeme spans one at a
//   time until the end sentinel.

pub mod config;
pub mod paths;
pub mod session;

pub use config::{ConfigError, DictEntry, SegParser};
pub use paths::{ConfigPathResolver, SharedDataResolver};
pub use session::ParserSession;
