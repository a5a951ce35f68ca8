//! @file scanner.rs
//! @brief Low-level maximal-munch scanners for C11 preprocessing tokens.
//!
//! @details
//! Each `scan_*` function consumes bytes from a fixed position and returns
//! the position one past the scanned construct, or `None` when the construct
//! is malformed (an unterminated literal, a bad escape). `scan_pp_token`
//! ties them together: it skips leading whitespace, classifies the next
//! token by its first character, and hands back the byte range of the
//! recognized token. Everything interesting is ASCII; the only place a
//! multi-byte character can appear on its own is the catch-all single
//! character case, which consumes the whole character.

use super::token::TokenKind;
use crate::modules::error::{ExpandError, Result};

/// One scanned preprocessing token: classification, whitespace flag, and
/// the byte range of its text within the scanned input.
///
/// # Fields
/// * `kind` - `Identifier`, `Stringify`, `Paste`, or `Other` (the scanner
///   never produces placemarkers).
/// * `ws` - Whether at least one whitespace byte was skipped before the
///   token.
/// * `start` - Byte offset of the first text byte.
/// * `end` - Byte offset one past the last text byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub kind: TokenKind,
    pub ws: bool,
    pub start: usize,
    pub end: usize,
}

fn is_space(byte: u8) -> bool {
    // The C-locale isspace set.
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn is_octal(byte: u8) -> bool {
    (b'0'..=b'7').contains(&byte)
}

/// Scans a sequence of one to three octal digits starting at `pos`.
pub fn scan_oct_seq(bytes: &[u8], pos: usize) -> usize {
    let mut cur = pos + 1;
    if cur < bytes.len() && is_octal(bytes[cur]) {
        cur += 1;
        if cur < bytes.len() && is_octal(bytes[cur]) {
            cur += 1;
        }
    }
    cur
}

/// Scans a sequence of one or two hexadecimal digits starting at `pos`.
pub fn scan_hex_seq(bytes: &[u8], pos: usize) -> usize {
    let mut cur = pos + 1;
    if cur < bytes.len() && bytes[cur].is_ascii_hexdigit() {
        cur += 1;
    }
    cur
}

/// Scans a character escape sequence starting at the backslash at `pos`.
///
/// # Returns
/// * `Some(end)` for a simple escape, `\x` with one or two hex digits, or
///   one to three octal digits.
/// * `None` when the character after the backslash is not a permitted
///   escape.
pub fn scan_escape_seq(bytes: &[u8], pos: usize) -> Option<usize> {
    let next = *bytes.get(pos + 1)?;
    match next {
        b'\'' | b'"' | b'\\' | b'?' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' => {
            Some(pos + 2)
        }
        b'x' => {
            let first = *bytes.get(pos + 2)?;
            if first.is_ascii_hexdigit() {
                Some(scan_hex_seq(bytes, pos + 2))
            } else {
                None
            }
        }
        b if is_octal(b) => Some(scan_oct_seq(bytes, pos + 1)),
        _ => None,
    }
}

/// Scans a character constant starting at the opening `'` at `pos`.
pub fn scan_character_constant(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut cur = pos + 1;
    match bytes.get(cur)? {
        &b'\\' => cur = scan_escape_seq(bytes, cur)?,
        _ => cur += 1,
    }
    if bytes.get(cur) == Some(&b'\'') {
        Some(cur + 1)
    } else {
        None
    }
}

/// Scans a string literal starting at the opening `"` at `pos`.
pub fn scan_string_literal(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut cur = pos + 1;
    loop {
        match bytes.get(cur)? {
            &b'"' => return Some(cur + 1),
            &b'\\' => cur = scan_escape_seq(bytes, cur)?,
            _ => cur += 1,
        }
    }
}

/// Scans a preprocessing number starting at the digit at `pos`.
///
/// pp-number:
///     digit
///     . digit
///     pp-number digit
///     pp-number identifier-nondigit
///     pp-number e sign / E sign / p sign / P sign
///     pp-number .
pub fn scan_pp_number(bytes: &[u8], pos: usize) -> usize {
    let mut cur = pos;
    while cur < bytes.len() {
        match bytes[cur] {
            b'e' | b'E' | b'p' | b'P' => {
                if cur + 1 < bytes.len() && matches!(bytes[cur + 1], b'+' | b'-') {
                    cur += 1;
                }
                cur += 1;
            }
            b if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' => cur += 1,
            _ => break,
        }
    }
    cur
}

// Consume one extra byte when it is in `candidates`.
fn one_or_two(bytes: &[u8], pos: usize, candidates: &[u8]) -> usize {
    match bytes.get(pos + 1) {
        Some(b) if candidates.contains(b) => pos + 2,
        _ => pos + 1,
    }
}

/// Scans the next preprocessing token of `input` starting at byte `from`.
///
/// preprocessing-token:
///     identifier
///     pp-number
///     character-constant
///     string-literal
///     punctuator
///     each non-white-space character that cannot be one of the above
///
/// # Returns
/// * `Ok(Some(scanned))` with the token's kind, whitespace flag, and text
///   range.
/// * `Ok(None)` when only whitespace (or nothing) remains.
/// * `Err(ExpandError::InvalidToken)` when the scanner cannot advance.
pub fn scan_pp_token(input: &str, from: usize) -> Result<Option<Scanned>> {
    let bytes = input.as_bytes();
    let mut pos = from;
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if pos >= bytes.len() {
        return Ok(None);
    }

    let ws = pos != from;
    let start = pos;
    let mut kind = TokenKind::Other;
    let first = bytes[pos];

    let end = if first.is_ascii_digit() {
        scan_pp_number(bytes, pos)
    } else if first == b'\'' {
        scan_character_constant(bytes, pos).ok_or(ExpandError::InvalidToken(start))?
    } else if first == b'"' {
        scan_string_literal(bytes, pos).ok_or(ExpandError::InvalidToken(start))?
    } else if first == b'_' || first.is_ascii_alphabetic() {
        kind = TokenKind::Identifier;
        let mut cur = pos + 1;
        while cur < bytes.len() && (bytes[cur] == b'_' || bytes[cur].is_ascii_alphanumeric()) {
            cur += 1;
        }
        cur
    } else {
        match first {
            b'-' => one_or_two(bytes, pos, &[b'-', b'=', b'>']),
            b'+' => one_or_two(bytes, pos, &[b'+', b'=']),
            b'&' => one_or_two(bytes, pos, &[b'&', b'=']),
            b'*' | b'~' | b'!' | b'/' | b'=' | b'^' => one_or_two(bytes, pos, &[b'=']),
            b'|' => one_or_two(bytes, pos, &[b'|', b'=']),
            b':' => one_or_two(bytes, pos, &[b'>']),
            b'%' => {
                let mut cur = pos + 1;
                match bytes.get(cur) {
                    Some(&b'=') | Some(&b'>') => cur += 1,
                    Some(&b':') => {
                        cur += 1;
                        if cur + 1 < bytes.len() && bytes[cur] == b'%' && bytes[cur + 1] == b':' {
                            cur += 2;
                        }
                    }
                    _ => {}
                }
                cur
            }
            b'<' => {
                let mut cur = pos + 1;
                match bytes.get(cur) {
                    Some(&b':') | Some(&b'%') | Some(&b'=') => cur += 1,
                    Some(&b'<') => {
                        cur += 1;
                        if bytes.get(cur) == Some(&b'=') {
                            cur += 1;
                        }
                    }
                    _ => {}
                }
                cur
            }
            b'>' => {
                let mut cur = pos + 1;
                match bytes.get(cur) {
                    Some(&b'=') => cur += 1,
                    Some(&b'>') => {
                        cur += 1;
                        if bytes.get(cur) == Some(&b'=') {
                            cur += 1;
                        }
                    }
                    _ => {}
                }
                cur
            }
            b'.' => match bytes.get(pos + 1) {
                Some(b) if b.is_ascii_digit() => scan_pp_number(bytes, pos + 1),
                Some(&b'.') if bytes.get(pos + 2) == Some(&b'.') => pos + 3,
                _ => pos + 1,
            },
            b'#' => {
                if bytes.get(pos + 1) == Some(&b'#') {
                    kind = TokenKind::Paste;
                    pos + 2
                } else {
                    kind = TokenKind::Stringify;
                    pos + 1
                }
            }
            _ => {
                // Brackets, braces, `? , ;`, and any stray character are one
                // token each. Consume whole characters, not bytes.
                let width = input[pos..].chars().next().map_or(1, char::len_utf8);
                pos + width
            }
        }
    };

    Ok(Some(Scanned { kind, ws, start, end }))
}
