// Lexical category table.
//
// The parser reports every lexeme under one of 26 fixed categories, coded by
// a single lowercase letter. The alias of each category is the letter itself;
// the description is a short human-readable label. Category id 0 is reserved
// as the end-of-sequence marker in the host protocol and has no entry here.

/// Number of lexical categories. Ids run from 1 to `LEX_TYPE_COUNT`.
pub const LEX_TYPE_COUNT: usize = 26;

/// Category id signalling "no more lexemes" in the host protocol.
pub const LEX_END: u8 = 0;

/// Single-letter aliases, indexed by category id (index 0 unused).
static ALIASES: [&str; LEX_TYPE_COUNT + 1] = [
    "", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];

/// Category descriptions, indexed by category id (index 0 unused).
static DESCRIPTIONS: [&str; LEX_TYPE_COUNT + 1] = [
    "",
    "adjective",
    "difference",
    "conjunction",
    "adverb",
    "exclamation",
    "position",
    "word root",
    "head",
    "idiom",
    "abbreviation",
    "head",
    "temp",
    "numeral",
    "noun",
    "onomatopoeia",
    "prepositional",
    "quantity",
    "pronoun",
    "space",
    "time",
    "auxiliary",
    "verb",
    "punctuation",
    "unknown",
    "modal",
    "status",
];

/// One entry of the category listing advertised to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexDescr {
    /// Category id, 1..=26.
    pub lexid: u8,
    /// Single-letter alias.
    pub alias: &'static str,
    /// Human-readable description.
    pub descr: &'static str,
}

/// Look up the alias and description for a category code.
///
/// Defined for codes `b'a'..=b'z'`; returns `None` for anything else
/// (including the id-0 end marker, which carries no alias or description).
pub fn category_info(code: u8) -> Option<(&'static str, &'static str)> {
    if !code.is_ascii_lowercase() {
        return None;
    }
    let id = (code - b'a' + 1) as usize;
    Some((ALIASES[id], DESCRIPTIONS[id]))
}

/// Clamp a raw engine category byte into the supported range.
///
/// Any byte outside `b'a'..=b'z'` maps to `b'x'`, the "unknown" bucket.
/// Engines that report composite categories such as `Ng` or `Vg` therefore
/// surface as unknown, matching the single-letter taxonomy.
pub fn clamp_category(raw: u8) -> u8 {
    if raw.is_ascii_lowercase() { raw } else { b'x' }
}

/// List all 26 categories in id order.
///
/// The host protocol expects this listing followed by an id-0 terminator;
/// appending the terminator is the caller's concern (the FFI layer does it).
pub fn list_categories() -> [LexDescr; LEX_TYPE_COUNT] {
    let mut out = [LexDescr { lexid: 0, alias: "", descr: "" }; LEX_TYPE_COUNT];
    let mut id = 1;
    while id <= LEX_TYPE_COUNT {
        out[id - 1] = LexDescr {
            lexid: id as u8,
            alias: ALIASES[id],
            descr: DESCRIPTIONS[id],
        };
        id += 1;
    }
    out
}
