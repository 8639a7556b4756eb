// Input charset selection.

/// Character encoding of the text buffers fed to the engine.
///
/// Only the two encodings the segmentation engines understand are
/// representable; validation of the user-supplied string happens in the
/// configuration compiler before a `Charset` value ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// GBK / GB2312 two-byte encoding.
    Gbk,
    /// UTF-8 encoding.
    Utf8,
}

impl Charset {
    /// Parse a charset name, case-insensitively. Returns `None` for any
    /// name other than `gbk` or `utf8`.
    pub fn from_name(name: &str) -> Option<Charset> {
        if name.eq_ignore_ascii_case("gbk") {
            Some(Charset::Gbk)
        } else if name.eq_ignore_ascii_case("utf8") {
            Some(Charset::Utf8)
        } else {
            None
        }
    }

    /// The canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Gbk => "gbk",
            Charset::Utf8 => "utf8",
        }
    }
}
