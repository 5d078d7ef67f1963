//! Bounded text scanning for axis labels and annotation markers.

/// Longest human-readable label kept from an axis line.
pub const MAX_LABEL_LENGTH: usize = 1024;

/// Splits `<letters and spaces><payload>` into a trimmed label and the payload.
///
/// The label is the leading run of ASCII letters and spaces, capped at
/// [`MAX_LABEL_LENGTH`] bytes; everything after it is returned untouched.
pub fn split_label(line: &[u8]) -> (String, &[u8]) {
    let run = line
        .iter()
        .take(MAX_LABEL_LENGTH)
        .take_while(|b| b.is_ascii_alphabetic() || **b == b' ')
        .count();
    let label = String::from_utf8_lossy(&line[..run]).trim().to_string();
    (label, &line[run..])
}

/// Parses every whitespace-separated integer in `payload`.
///
/// Returns `None` if any token is not an integer.
pub fn parse_int_payload(payload: &[u8]) -> Option<Vec<i64>> {
    std::str::from_utf8(payload)
        .ok()?
        .split_ascii_whitespace()
        .map(|token| token.parse().ok())
        .collect()
}

/// Finds `needle` in `haystack[from..]`, returning its absolute start.
pub fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Length of `bytes` once trailing NUL and whitespace bytes are dropped.
pub fn trimmed_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rposition(|b| *b != 0 && !b.is_ascii_whitespace())
        .map_or(0, |last| last + 1)
}
