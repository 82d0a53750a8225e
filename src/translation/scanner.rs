#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    QuotedIdentifier(u8),
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

pub(super) fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan a parameter identifier (`[A-Za-z][A-Za-z0-9_]*`) starting at `start`.
///
/// Returns the exclusive end offset. The scan is greedy, so a shorter name is never reported
/// as a prefix of a longer one.
pub(super) fn scan_identifier(bytes: &[u8], start: usize) -> Option<usize> {
    if !bytes.get(start).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && is_identifier_byte(bytes[idx]) {
        idx += 1;
    }
    Some(idx)
}
