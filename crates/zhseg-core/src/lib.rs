// zhseg-core: shared leaf types for the zhseg segmentation parser.
//
// Holds the fixed lexical category table, the lexeme span type produced by
// tokenizer sessions, the dictionary-load-mode and multi-mode bitmasks, and
// the charset enum. No dependencies; everything here is plain data shared by
// the engine, parser, CLI and FFI crates.

pub mod charset;
pub mod flags;
pub mod lexeme;
pub mod lextype;
