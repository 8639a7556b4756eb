// Scalar classification over raw byte buffers.
//
// The reference engine walks the sent buffer one scalar at a time and
// classifies each into a coarse class; runs of equal classes become lexeme
// candidates. The walk understands the two supported charsets: UTF-8 is
// decoded properly, GBK is handled structurally (lead byte >= 0x80 consumes
// a two-byte unit, which is enough for offset-correct segmentation without
// shipping codepage tables).

use zhseg_core::charset::Charset;

/// Coarse class of one scalar in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarClass {
    /// Alphabetic (non-Han) letter.
    Letter,
    /// Decimal digit, halfwidth or fullwidth.
    Digit,
    /// Whitespace, including ideographic space.
    Whitespace,
    /// Punctuation, ASCII or CJK.
    Punctuation,
    /// Han ideograph (or an undecodable GBK unit, treated alike).
    Han,
    /// Anything else.
    Unknown,
}

/// One decoded scalar: its byte length and class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    pub len: usize,
    pub class: ScalarClass,
}

/// Decode and classify the scalar starting at `pos`.
///
/// Always consumes at least one byte, so a scan loop over `next_scalar`
/// terminates on arbitrary input. `pos` must be below `buf.len()`.
pub fn next_scalar(buf: &[u8], pos: usize, charset: Charset) -> Scalar {
    let b = buf[pos];
    if b < 0x80 {
        return Scalar { len: 1, class: classify_ascii(b) };
    }
    match charset {
        Charset::Gbk => {
            // Lead byte of a two-byte GBK unit; a dangling lead byte at the
            // end of the buffer is consumed alone.
            let len = if pos + 1 < buf.len() { 2 } else { 1 };
            Scalar { len, class: ScalarClass::Han }
        }
        Charset::Utf8 => {
            let want = utf8_seq_len(b);
            let end = pos + want;
            if want == 0 || end > buf.len() {
                return Scalar { len: 1, class: ScalarClass::Unknown };
            }
            match core::str::from_utf8(&buf[pos..end]) {
                Ok(s) => {
                    let c = s.chars().next().unwrap_or('\u{FFFD}');
                    Scalar { len: want, class: classify_char(c) }
                }
                Err(_) => Scalar { len: 1, class: ScalarClass::Unknown },
            }
        }
    }
}

/// Expected UTF-8 sequence length for a leading byte, 0 if not a valid lead.
fn utf8_seq_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn classify_ascii(b: u8) -> ScalarClass {
    if b.is_ascii_alphabetic() {
        ScalarClass::Letter
    } else if b.is_ascii_digit() {
        ScalarClass::Digit
    } else if b.is_ascii_whitespace() {
        ScalarClass::Whitespace
    } else if b.is_ascii_punctuation() {
        ScalarClass::Punctuation
    } else {
        ScalarClass::Unknown
    }
}

/// Classify a decoded non-ASCII character.
fn classify_char(c: char) -> ScalarClass {
    let cp = c as u32;
    if (0x4E00..=0x9FFF).contains(&cp)       // CJK Unified Ideographs
        || (0x3400..=0x4DBF).contains(&cp)   // CJK Extension A
        || (0xF900..=0xFAFF).contains(&cp)
    // CJK Compatibility Ideographs
    {
        return ScalarClass::Han;
    }
    if (0x3000..=0x303F).contains(&cp)       // CJK symbols and punctuation
        || (0xFF01..=0xFF0F).contains(&cp)   // fullwidth ASCII punctuation
        || (0xFF1A..=0xFF20).contains(&cp)
        || (0xFF3B..=0xFF40).contains(&cp)
        || (0xFF5B..=0xFF65).contains(&cp)
    {
        return ScalarClass::Punctuation;
    }
    if (0xFF10..=0xFF19).contains(&cp) {
        // Fullwidth digits
        return ScalarClass::Digit;
    }
    if c.is_whitespace() {
        return ScalarClass::Whitespace;
    }
    if c.is_alphabetic() {
        return ScalarClass::Letter;
    }
    if c.is_numeric() {
        return ScalarClass::Digit;
    }
    ScalarClass::Unknown
}
