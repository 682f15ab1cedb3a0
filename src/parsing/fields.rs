//! Fixed-width field extraction and small field-shape helpers.
//!
//! AFD layouts are specified as 1-based inclusive column positions. Columns
//! count characters, which coincide with bytes in the file's ISO-8859-1
//! encoding; after decoding to UTF-8 the slicing here stays char-positional.

use crate::error::{AfdError, AfdResult};

/// Extracts the 1-based inclusive column span `[start, end]` from a line.
///
/// Out-of-range spans are clipped to the end of the line rather than
/// panicking; callers guarantee in-range access through their minimum-length
/// gates, so clipping only arises for trailing free-text fields.
pub(crate) fn slice(line: &str, start: usize, end: usize) -> &str {
    debug_assert!(start >= 1);
    if end < start {
        return "";
    }
    let mut indices = line.char_indices().map(|(i, _)| i);
    let Some(from) = indices.nth(start - 1) else {
        return "";
    };
    match indices.nth(end - start) {
        Some(to) => &line[from..to],
        None => &line[from..],
    }
}

/// Returns true iff `s` is non-empty and entirely ASCII digits.
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Coerces an all-digit field to an integer, rejecting signs, spaces and
/// any other non-digit character.
pub(crate) fn parse_number(s: &str, field: &str) -> AfdResult<u64> {
    if !is_digits(s) {
        return Err(AfdError::FormatMismatch {
            field: field.to_string(),
            value: s.to_string(),
        });
    }
    s.parse::<u64>().map_err(|_| AfdError::FormatMismatch {
        field: field.to_string(),
        value: s.to_string(),
    })
}

/// Converts an 8-digit `DDMMYYYY` date to `YYYY-MM-DD`, or `None` when the
/// field is not 8 digits.
pub(crate) fn ddmmyyyy_to_iso(d: &str) -> Option<String> {
    if d.len() == 8 && is_digits(d) {
        Some(format!("{}-{}-{}", &d[4..8], &d[2..4], &d[0..2]))
    } else {
        None
    }
}

/// Converts a 4-digit `HHMM` time to `HH:MM`, or `None` when the field is
/// not 4 digits.
pub(crate) fn hhmm_to_iso(h: &str) -> Option<String> {
    if h.len() == 4 && is_digits(h) {
        Some(format!("{}:{}", &h[0..2], &h[2..4]))
    } else {
        None
    }
}

/// Returns true iff `s` matches `\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:00[+-]\d{4}`,
/// the shape of every official-layout timestamp field.
pub(crate) fn is_iso_datetime(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 24 {
        return false;
    }
    let digit = |i: usize| b[i].is_ascii_digit();
    (0..4).all(digit)
        && b[4] == b'-'
        && (5..7).all(digit)
        && b[7] == b'-'
        && (8..10).all(digit)
        && b[10] == b'T'
        && (11..13).all(digit)
        && b[13] == b':'
        && (14..16).all(digit)
        && b[16] == b':'
        && b[17] == b'0'
        && b[18] == b'0'
        && (b[19] == b'+' || b[19] == b'-')
        && (20..24).all(digit)
}
