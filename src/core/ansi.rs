//! ANSI escape sequence handling
//!
//! A CSI sequence is `ESC [`, parameter bytes `0`..`?`, intermediate bytes
//! `!`..`/` and one final byte `@`..`~`. Quote and backslash never belong to
//! a sequence, so stripping cannot eat into the quoting of an encoded value.
//! An ESC that does not start a complete sequence is dropped on its own.

pub(crate) const ESC: u8 = 0x1b;

/// ESC as written inside a JSON string
const JSON_ESC: &[u8] = b"\\u001b";

/// True if `bytes` contains an escape character
#[inline]
pub fn contains_ansi(bytes: &[u8]) -> bool {
    bytes.contains(&ESC)
}

/// True if `bytes` contains an escape character in JSON string form
#[inline]
pub fn contains_json_ansi(bytes: &[u8]) -> bool {
    bytes.windows(JSON_ESC.len()).any(is_json_esc)
}

/// True when every ESC in `bytes` starts a complete escape sequence
pub fn escapes_complete(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    while let Some(at) = rest.iter().position(|&b| b == ESC) {
        let len = sequence_len(&rest[at + 1..]);
        if len == 0 {
            return false;
        }
        rest = &rest[at + 1 + len..];
    }
    true
}

/// Copy `input` into `out` without ANSI escape sequences.
///
/// ```
/// use rust_field_logger::core::ansi::strip_ansi;
///
/// let mut out = Vec::new();
/// strip_ansi(b"\x1b[32mINFO\x1b[0m ready", &mut out);
/// assert_eq!(out, b"INFO ready");
/// ```
pub fn strip_ansi(input: &[u8], out: &mut Vec<u8>) {
    out.reserve(input.len());
    let mut i = 0;
    while let Some(offset) = input[i..].iter().position(|&b| b == ESC) {
        let at = i + offset;
        out.extend_from_slice(&input[i..at]);
        i = at + 1 + sequence_len(&input[at + 1..]);
    }
    out.extend_from_slice(&input[i..]);
}

/// Copy JSON text into `out` without escape sequences written as `\u001b`.
///
/// Other JSON escapes are copied unchanged, so an escaped backslash followed
/// by `u001b` is left alone.
pub fn strip_json_ansi(input: &[u8], out: &mut Vec<u8>) {
    out.reserve(input.len());
    let mut i = 0;
    while let Some(offset) = input[i..].iter().position(|&b| b == b'\\') {
        let at = i + offset;
        out.extend_from_slice(&input[i..at]);
        let rest = &input[at..];
        if rest.len() >= JSON_ESC.len() && is_json_esc(&rest[..JSON_ESC.len()]) {
            let body = at + JSON_ESC.len();
            i = body + sequence_len(&input[body..]);
        } else {
            let len = if rest.get(1) == Some(&b'u') { 6 } else { 2 };
            let len = len.min(rest.len());
            out.extend_from_slice(&rest[..len]);
            i = at + len;
        }
    }
    out.extend_from_slice(&input[i..]);
}

fn is_json_esc(bytes: &[u8]) -> bool {
    bytes.eq_ignore_ascii_case(JSON_ESC)
}

/// Length of the sequence following an ESC, 0 when it is not complete
fn sequence_len(rest: &[u8]) -> usize {
    match rest.first() {
        Some(b'[') => {
            let mut i = 1;
            while rest.get(i).is_some_and(|b| (0x30..=0x3f).contains(b)) {
                i += 1;
            }
            while rest.get(i).is_some_and(|&b| (0x20..=0x2f).contains(&b) && b != b'"') {
                i += 1;
            }
            match rest.get(i) {
                Some(&b) if (0x40..=0x7e).contains(&b) && b != b'\\' => i + 1,
                _ => 0,
            }
        }
        Some(&b) if (0x30..=0x7e).contains(&b) && b != b'\\' => 1,
        _ => 0,
    }
}
