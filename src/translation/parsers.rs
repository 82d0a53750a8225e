pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    // tags never start with a digit, which keeps `$1` positional markers out
    if bytes.get(start + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..=end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}

/// Whether `prefix` starts at `idx` and is not glued to a preceding identifier or a repeated
/// sigil (`::type` casts, `@@ROWCOUNT` globals).
pub(super) fn is_parameter_start(bytes: &[u8], idx: usize, prefix: &[u8]) -> bool {
    if prefix.is_empty() || !bytes[idx..].starts_with(prefix) {
        return false;
    }
    match idx.checked_sub(1).map(|prev| bytes[prev]) {
        Some(prev) => prev != prefix[0] && !super::scanner::is_identifier_byte(prev),
        None => true,
    }
}
