// FFI functions are inherently unsafe — callers must ensure pointer validity.
// Safety contracts are documented per-function in the public API comments.
#![allow(clippy::missing_safety_doc)]

// zhseg-ffi: C-compatible FFI layer for the tokenizer session protocol.
//
// This is the host consumer surface: a text-search host drives it as
// start / getlexeme-until-0 / end, plus the lextype listing advertising the
// 26 categories.
//
// Memory management rules:
// - Opaque `ZhsegParser` pointer: created by `zhseg_new`, freed by `zhseg_free`.
// - Opaque `ZhsegSession` pointer: created by `zhseg_start`, freed by `zhseg_end`.
// - The lextype array: freed by `zhseg_free_lextype`.
// - Error strings: caller must free with `zhseg_free_str`.
// - The text buffer passed to `zhseg_start` stays owned by the caller and
//   MUST stay alive and unmodified until `zhseg_end`; every lexeme is an
//   offset/length into it.

use std::ffi::{CStr, CString, c_char, c_int};
use std::ptr;
use std::slice;

use zhseg_core::lextype;
use zhseg_engine::CharClassEngine;
use zhseg_parser::{ParserSession, SegParser, SharedDataResolver};

/// Opaque parser handle.
pub struct ZhsegParser {
    inner: SegParser<CharClassEngine>,
}

/// Opaque session handle. The `'static` is a lie the C boundary forces on
/// us; the real lifetime is "until zhseg_end", bounded by the caller's
/// buffer per the rules above.
pub struct ZhsegSession {
    inner: ParserSession<'static, CharClassEngine>,
}

// ── Parser lifecycle ─────────────────────────────────────────────

/// Create a parser whose shared data directory is `data_dir` (UTF-8,
/// null-terminated). Rule files and dictionaries named in options resolve
/// under `<data_dir>/tsearch_data/`.
///
/// Returns an opaque pointer on success, NULL on failure. On failure, if
/// `error_out` is non-NULL it receives a heap-allocated error string the
/// caller must free with `zhseg_free_str`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_new(
    data_dir: *const c_char,
    error_out: *mut *mut c_char,
) -> *mut ZhsegParser {
    let Some(data_dir) = cstr_to_str(data_dir) else {
        set_error(error_out, "data_dir is null or not UTF-8");
        return ptr::null_mut();
    };
    match CharClassEngine::new() {
        Ok(engine) => {
            let parser = SegParser::new(engine, Box::new(SharedDataResolver::new(data_dir)));
            Box::into_raw(Box::new(ZhsegParser { inner: parser }))
        }
        Err(e) => {
            set_error(error_out, &e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a parser created by `zhseg_new`. All sessions opened on it must be
/// ended first.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_free(parser: *mut ZhsegParser) {
    if !parser.is_null() {
        drop(unsafe { Box::from_raw(parser) });
    }
}

// ── Configuration ───────────────────────────────────────────────

/// Set a named option. String options (`charset`, `rules`, `extra_dicts`,
/// `multi_mode`) are validated and committed atomically; boolean options
/// (`punctuation_ignore`, `seg_with_duality`, `dict_in_memory`) accept
/// `on`/`off`, `true`/`false` or `1`/`0`.
///
/// Returns 0 on success, -1 on failure. On failure nothing was applied and
/// `error_out` (if non-NULL) receives an error string to free with
/// `zhseg_free_str`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_set_option(
    parser: *mut ZhsegParser,
    name: *const c_char,
    value: *const c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    let Some(parser) = (unsafe { parser.as_mut() }) else {
        set_error(error_out, "parser is null");
        return -1;
    };
    let Some(name) = cstr_to_str(name) else {
        set_error(error_out, "option name is null or not UTF-8");
        return -1;
    };
    let Some(value) = cstr_to_str(value) else {
        set_error(error_out, "option value is null or not UTF-8");
        return -1;
    };

    let result = match name {
        "charset" => parser.inner.set_charset(value),
        "rules" => parser.inner.set_rules(value),
        "extra_dicts" => parser.inner.set_extra_dicts(value),
        "multi_mode" => parser.inner.set_multi_mode(value),
        "punctuation_ignore" | "seg_with_duality" | "dict_in_memory" => {
            let Some(flag) = parse_bool(value) else {
                set_error(error_out, &format!("not a boolean: \"{value}\""));
                return -1;
            };
            match name {
                "punctuation_ignore" => parser.inner.set_punctuation_ignore(flag),
                "seg_with_duality" => parser.inner.set_seg_with_duality(flag),
                _ => parser.inner.set_dict_in_memory(flag),
            }
            return 0;
        }
        _ => {
            set_error(error_out, &format!("unknown option: \"{name}\""));
            return -1;
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            set_error(error_out, &e.to_string());
            -1
        }
    }
}

// ── Session protocol ────────────────────────────────────────────

/// Open a tokenizer session over `buffer` (length `len` bytes, not
/// necessarily null-terminated).
///
/// The buffer is NOT copied. It must stay alive and unmodified until
/// `zhseg_end`; offsets returned by `zhseg_getlexeme` index into it.
/// Returns NULL if `parser` or `buffer` is null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_start(
    parser: *const ZhsegParser,
    buffer: *const c_char,
    len: c_int,
) -> *mut ZhsegSession {
    let Some(parser) = (unsafe { parser.as_ref() }) else {
        return ptr::null_mut();
    };
    if buffer.is_null() || len < 0 {
        return ptr::null_mut();
    }
    // Lifetime erased at the boundary; see the rules at the top.
    let text: &'static [u8] = unsafe { slice::from_raw_parts(buffer.cast::<u8>(), len as usize) };
    let session = parser.inner.open_session(text);
    Box::into_raw(Box::new(ZhsegSession { inner: session }))
}

/// Fetch the next lexeme.
///
/// On a lexeme, writes its byte offset and length into `off_out`/`len_out`
/// and returns the category code (`'a'..='z'`). Returns 0 when the session
/// is exhausted (and on every later call), with `*len_out` set to 0.
/// Returns -1 if any pointer is null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_getlexeme(
    session: *mut ZhsegSession,
    off_out: *mut c_int,
    len_out: *mut c_int,
) -> c_int {
    let Some(session) = (unsafe { session.as_mut() }) else {
        return -1;
    };
    if off_out.is_null() || len_out.is_null() {
        return -1;
    }

    let span = session.inner.next_lexeme();
    unsafe {
        *off_out = span.off as c_int;
        *len_out = span.len as c_int;
    }
    span.category as c_int
}

/// End a session created by `zhseg_start`, releasing its engine fork.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_end(session: *mut ZhsegSession) {
    if !session.is_null() {
        drop(unsafe { Box::from_raw(session) });
    }
}

// ── Category listing ────────────────────────────────────────────

/// One entry of the category listing.
#[repr(C)]
pub struct ZhsegLexDescr {
    /// Category id 1..=26, or 0 on the terminating entry.
    pub lexid: c_int,
    pub alias: *mut c_char,
    pub descr: *mut c_char,
}

/// List the 26 lexical categories.
///
/// Returns a heap-allocated array of 27 entries: ids 1..=26 in order,
/// terminated by an entry with `lexid == 0` and null strings. Caller must
/// free with `zhseg_free_lextype`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_lextype() -> *mut ZhsegLexDescr {
    let mut entries = build_lextype_listing();
    let ptr = entries.as_mut_ptr();
    std::mem::forget(entries);
    ptr
}

/// Build the listing with capacity exactly `LEX_TYPE_COUNT + 1`, the
/// capacity `zhseg_free_lextype` reconstructs the `Vec` with. Any
/// reallocation here would make the free deallocate with the wrong layout.
fn build_lextype_listing() -> Vec<ZhsegLexDescr> {
    let mut entries = Vec::with_capacity(lextype::LEX_TYPE_COUNT + 1);
    for d in lextype::list_categories() {
        entries.push(ZhsegLexDescr {
            lexid: d.lexid as c_int,
            alias: str_to_c(d.alias),
            descr: str_to_c(d.descr),
        });
    }
    entries.push(ZhsegLexDescr {
        lexid: 0,
        alias: ptr::null_mut(),
        descr: ptr::null_mut(),
    });
    entries
}

/// Free a listing returned by `zhseg_lextype`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_free_lextype(listing: *mut ZhsegLexDescr) {
    if listing.is_null() {
        return;
    }
    let count = lextype::LEX_TYPE_COUNT + 1;
    let entries = unsafe { Vec::from_raw_parts(listing, count, count) };
    for e in entries {
        free_c_str(e.alias);
        free_c_str(e.descr);
    }
}

/// Free a heap-allocated error string returned by zhseg functions.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn zhseg_free_str(s: *mut c_char) {
    free_c_str(s);
}

// ── Internal helpers ────────────────────────────────────────────

fn cstr_to_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

fn str_to_c(s: &str) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

fn set_error(out: *mut *mut c_char, msg: &str) {
    if !out.is_null() {
        unsafe {
            *out = str_to_c(msg);
        }
    }
}

fn free_c_str(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("on")
        || value.eq_ignore_ascii_case("true")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("false")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn new_parser(dir: &tempfile::TempDir) -> *mut ZhsegParser {
        let data_dir = c(dir.path().to_str().unwrap());
        let mut err: *mut c_char = ptr::null_mut();
        let parser = unsafe { zhseg_new(data_dir.as_ptr(), &mut err) };
        assert!(!parser.is_null());
        assert!(err.is_null());
        parser
    }

    /// Read and free an error string produced by a failing call.
    fn take_error(err: *mut c_char) -> String {
        assert!(!err.is_null());
        let msg = unsafe { CStr::from_ptr(err) }.to_str().unwrap().to_owned();
        unsafe { zhseg_free_str(err) };
        msg
    }

    #[test]
    fn consumer_protocol_start_getlexeme_end() {
        let dir = tempfile::tempdir().unwrap();
        let parser = new_parser(&dir);

        let text = b"hello world";
        let session =
            unsafe { zhseg_start(parser, text.as_ptr().cast(), text.len() as c_int) };
        assert!(!session.is_null());

        let mut off: c_int = -1;
        let mut len: c_int = -1;
        let cat = unsafe { zhseg_getlexeme(session, &mut off, &mut len) };
        assert_eq!((cat, off, len), (b'n' as c_int, 0, 5));
        let cat = unsafe { zhseg_getlexeme(session, &mut off, &mut len) };
        assert_eq!((cat, off, len), (b'n' as c_int, 6, 5));

        // Exhaustion returns 0 with a zero length, and keeps doing so.
        assert_eq!(unsafe { zhseg_getlexeme(session, &mut off, &mut len) }, 0);
        assert_eq!(len, 0);
        assert_eq!(unsafe { zhseg_getlexeme(session, &mut off, &mut len) }, 0);

        unsafe { zhseg_end(session) };
        unsafe { zhseg_free(parser) };
    }

    #[test]
    fn set_option_success_and_error_paths() {
        let dir = tempfile::tempdir().unwrap();
        let parser = new_parser(&dir);
        let mut err: *mut c_char = ptr::null_mut();

        let name = c("charset");
        let ok = c("gbk");
        assert_eq!(
            unsafe { zhseg_set_option(parser, name.as_ptr(), ok.as_ptr(), &mut err) },
            0
        );
        assert!(err.is_null());

        let bad = c("latin1");
        assert_eq!(
            unsafe { zhseg_set_option(parser, name.as_ptr(), bad.as_ptr(), &mut err) },
            -1
        );
        assert!(take_error(err).contains("latin1"));
        err = ptr::null_mut();

        let name = c("punctuation_ignore");
        let on = c("on");
        assert_eq!(
            unsafe { zhseg_set_option(parser, name.as_ptr(), on.as_ptr(), &mut err) },
            0
        );
        let maybe = c("maybe");
        assert_eq!(
            unsafe { zhseg_set_option(parser, name.as_ptr(), maybe.as_ptr(), &mut err) },
            -1
        );
        assert!(take_error(err).contains("not a boolean"));
        err = ptr::null_mut();

        let name = c("no_such_option");
        assert_eq!(
            unsafe { zhseg_set_option(parser, name.as_ptr(), on.as_ptr(), &mut err) },
            -1
        );
        assert!(take_error(err).contains("unknown option"));

        unsafe { zhseg_free(parser) };
    }

    #[test]
    fn null_pointers_are_rejected() {
        let mut err: *mut c_char = ptr::null_mut();
        assert!(unsafe { zhseg_new(ptr::null(), &mut err) }.is_null());
        assert!(!take_error(err).is_empty());

        let name = c("charset");
        let value = c("utf8");
        assert_eq!(
            unsafe {
                zhseg_set_option(ptr::null_mut(), name.as_ptr(), value.as_ptr(), ptr::null_mut())
            },
            -1
        );

        assert!(unsafe { zhseg_start(ptr::null(), b"x".as_ptr().cast(), 1) }.is_null());

        let mut off: c_int = 0;
        let mut len: c_int = 0;
        assert_eq!(unsafe { zhseg_getlexeme(ptr::null_mut(), &mut off, &mut len) }, -1);

        // Frees of null are all no-ops.
        unsafe {
            zhseg_end(ptr::null_mut());
            zhseg_free(ptr::null_mut());
            zhseg_free_lextype(ptr::null_mut());
            zhseg_free_str(ptr::null_mut());
        }
    }

    #[test]
    fn lextype_listing_roundtrip() {
        let listing = unsafe { zhseg_lextype() };
        assert!(!listing.is_null());

        for i in 0..lextype::LEX_TYPE_COUNT {
            let entry = unsafe { &*listing.add(i) };
            assert_eq!(entry.lexid, (i + 1) as c_int);
            let alias = unsafe { CStr::from_ptr(entry.alias) }.to_str().unwrap();
            assert_eq!(alias.len(), 1);
            assert!(!unsafe { CStr::from_ptr(entry.descr) }.to_bytes().is_empty());
        }
        let terminator = unsafe { &*listing.add(lextype::LEX_TYPE_COUNT) };
        assert_eq!(terminator.lexid, 0);
        assert!(terminator.alias.is_null());
        assert!(terminator.descr.is_null());

        unsafe { zhseg_free_lextype(listing) };
    }

    #[test]
    fn lextype_listing_capacity_matches_the_free() {
        // The free reconstructs the Vec with length and capacity
        // LEX_TYPE_COUNT + 1, so the builder must allocate exactly that.
        let listing = build_lextype_listing();
        assert_eq!(listing.len(), lextype::LEX_TYPE_COUNT + 1);
        assert_eq!(listing.capacity(), lextype::LEX_TYPE_COUNT + 1);
        for e in listing {
            free_c_str(e.alias);
            free_c_str(e.descr);
        }
    }
}
