//! Percent encoding and decoding under the two supported charsets.
//!
//! Decoding never fails. Malformed escapes are left in the output as they
//! appeared in the input, and the `+` to space rewrite is always applied.
//!
//! ```rust
//! use qs_value::codec::{decode, encode};
//! use qs_value::Charset;
//!
//! assert_eq!(decode("a+b%20c", Charset::Utf8), "a b c");
//! assert_eq!(decode("%:%}", Charset::Utf8), "%:%}");
//! assert_eq!(encode("a b", Charset::Utf8), "a%20b");
//! assert_eq!(encode("\u{263A}", Charset::Iso88591), "%26%239786%3B");
//! ```

use crate::Charset;
use percent_encoding::{
    percent_decode_str, percent_encode_byte, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC,
};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Token announcing a UTF-8 encoded query string (`utf8=✓`).
pub const UTF8_SENTINEL: &str = "utf8=%E2%9C%93";

/// Token announcing an ISO-8859-1 encoded query string (`utf8=&#10003;`).
pub const ISO_SENTINEL: &str = "utf8=%26%2310003%3B";

/// Bytes that survive UTF-8 encoding: `A-Z a-z 0-9 - _ . ~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Decodes one key or value.
///
/// Under UTF-8 the percent escapes must form valid UTF-8 as a whole; if any
/// escape is malformed the text is returned with only `+` replaced. Under
/// ISO-8859-1 each valid `%XX` escape maps to the code point `U+00XX` and
/// anything else is kept verbatim.
#[must_use]
pub fn decode(input: &str, charset: Charset) -> String {
    let text = input.replace('+', " ");
    if !text.contains('%') {
        return text;
    }
    match charset {
        Charset::Utf8 => decode_utf8(&text).unwrap_or(text),
        Charset::Iso88591 => decode_latin1(&text),
    }
}

fn decode_utf8(text: &str) -> Option<String> {
    if has_malformed_escape(text) {
        return None;
    }
    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Returns `true` if some `%` is not followed by two hex digits.
fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'%' && escape_byte(bytes, i).is_none())
}

/// The byte encoded by the `%XX` escape starting at `i`, if it is one.
fn escape_byte(bytes: &[u8], i: usize) -> Option<u8> {
    let digits = bytes.get(i + 1..i + 3)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(digits).ok()?;
    u8::from_str_radix(digits, 16).ok()
}

fn decode_latin1(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = escape_byte(bytes, i) {
                out.push(char::from(byte));
                i += 3;
                continue;
            }
        }
        // `i` always sits on a char boundary: escapes are pure ASCII.
        let ch = text[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Encodes one key or value.
///
/// UTF-8 leaves `A-Z a-z 0-9 - _ . ~` alone and escapes every other byte
/// as `%XX` with uppercase hex. ISO-8859-1 follows the legacy `escape`
/// rules: `A-Z a-z 0-9 @ * _ + - . /` pass through, code points below 256
/// become `%XX`, and anything wider becomes the escaped numeric entity
/// `%26%23NNNN%3B`.
#[must_use]
pub fn encode(input: &str, charset: Charset) -> String {
    if input.is_empty() {
        return String::new();
    }
    match charset {
        Charset::Utf8 => utf8_percent_encode(input, QUERY_COMPONENT).to_string(),
        Charset::Iso88591 => encode_latin1(input),
    }
}

fn encode_latin1(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let code = u32::from(ch);
        match u8::try_from(code) {
            Ok(byte) if byte.is_ascii() && is_legacy_unescaped_byte(byte) => out.push(ch),
            Ok(byte) => out.push_str(percent_encode_byte(byte)),
            Err(_) => {
                out.push_str("%26%23");
                out.push_str(&code.to_string());
                out.push_str("%3B");
            }
        }
    }
    out
}

/// Replaces HTML numeric entities (`&#9786;`) with the characters they name.
///
/// Entities naming an invalid code point are kept verbatim.
///
/// ```rust
/// use qs_value::codec::interpret_numeric_entities;
///
/// assert_eq!(interpret_numeric_entities("&#9786; &#x41;"), "\u{263A} &#x41;");
/// ```
#[must_use]
pub fn interpret_numeric_entities(input: &str) -> String {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    let entity = ENTITY.get_or_init(|| Regex::new(r"&#(\d+);").expect("static pattern"));
    entity
        .replace_all(input, |caps: &Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn is_legacy_unescaped_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'@' | b'*' | b'_' | b'+' | b'-' | b'.' | b'/')
}
