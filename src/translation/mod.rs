//! Parameter-token scanning over command text.
//!
//! The scanner walks the text with a small state machine so that tokens inside string
//! literals, escaped identifiers, comments, and dollar-quoted bodies are never reported.

use std::collections::HashMap;

mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, is_parameter_start,
    matches_tag, try_start_dollar_quote,
};
use scanner::{State, scan_identifier};

use crate::command::Command;
use crate::dialect::CommandFormatProvider;
use crate::error::SqlBatchError;
use crate::types::RowValues;

/// A parameter token found in command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterMatch<'a> {
    /// Byte offset of the token (prefix included).
    pub offset: usize,
    /// The full token, prefix included.
    pub token: &'a str,
}

impl ParameterMatch<'_> {
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.token.len()
    }
}

/// Target placeholder style for positional rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

/// Find every parameter token of `format`'s dialect in `sql`, in ascending offset order.
///
/// A token is the dialect prefix followed by `[A-Za-z][A-Za-z0-9_]*`, matched greedily, so
/// `@id` is never reported inside `@identifier`.
#[must_use]
pub fn find_parameter_tokens<'a>(
    sql: &'a str,
    format: &dyn CommandFormatProvider,
) -> Vec<ParameterMatch<'a>> {
    let prefix = format.parameter_prefix();
    let prefix = prefix.as_bytes();
    let (open_quote, close_quote) = format.identifier_quotes();
    let dollar_quotes = format.supports_dollar_quotes();
    let hash_comments = format.supports_hash_comments();
    let backslash_escapes = format.supports_backslash_escapes();

    let mut found = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                _ if open_quote.is_ascii() && b == open_quote as u8 => {
                    state = State::QuotedIdentifier(close_quote as u8);
                }
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                b'#' if hash_comments => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' if dollar_quotes => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                _ if is_parameter_start(bytes, idx, prefix) => {
                    if let Some(end) = scan_identifier(bytes, idx + prefix.len()) {
                        found.push(ParameterMatch {
                            offset: idx,
                            token: &sql[idx..end],
                        });
                        idx = end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\\' && backslash_escapes {
                    idx += 1;
                } else if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::QuotedIdentifier(close) => {
                if b == close {
                    if bytes.get(idx + 1) == Some(&close) {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    idx += 1;
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len + 1;
                }
            }
        }

        idx += 1;
    }

    found
}

/// Rewrite a command's named tokens into positional placeholders.
///
/// Each distinct token gets one position, assigned in order of first appearance, and the
/// returned values follow placeholder order. This is what drivers without named parameters
/// (PostgreSQL wire drivers, positional `SQLite` bindings) need.
///
/// # Errors
/// Returns `SqlBatchError::ConsistencyError` if the text references a parameter the command does
/// not declare.
pub fn bind_positional(
    command: &Command,
    format: &dyn CommandFormatProvider,
    style: PlaceholderStyle,
) -> Result<(String, Vec<RowValues>), SqlBatchError> {
    let text = command.text();
    let marker = match style {
        PlaceholderStyle::Postgres => '$',
        PlaceholderStyle::Sqlite => '?',
    };

    let mut out = String::with_capacity(text.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut values = Vec::new();
    let mut cursor = 0;

    for found in find_parameter_tokens(text, format) {
        let position = match positions.get(found.token) {
            Some(position) => *position,
            None => {
                let parameter = command.parameter(found.token).ok_or_else(|| {
                    SqlBatchError::ConsistencyError(format!(
                        "parameter {} not found inside the parameters collection",
                        found.token
                    ))
                })?;
                values.push(parameter.value.clone());
                positions.insert(found.token, values.len());
                values.len()
            }
        };
        out.push_str(&text[cursor..found.offset]);
        out.push(marker);
        out.push_str(&position.to_string());
        cursor = found.end();
    }
    out.push_str(&text[cursor..]);

    Ok((out, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandParameter;
    use crate::dialect::{MssqlFormat, MysqlFormat, PostgresFormat, SqliteFormat};

    fn tokens<'a>(sql: &'a str, format: &dyn CommandFormatProvider) -> Vec<&'a str> {
        find_parameter_tokens(sql, format)
            .into_iter()
            .map(|m| m.token)
            .collect()
    }

    #[test]
    fn short_names_do_not_match_inside_longer_ones() {
        let sql = "UPDATE t SET identifier=@identifier WHERE id=@id";
        assert_eq!(tokens(sql, &MssqlFormat), vec!["@identifier", "@id"]);
    }

    #[test]
    fn skips_literals_comments_and_quoted_identifiers() {
        let sql = "SELECT '@a', [x@b] -- @c\n/* @d /* @e */ */ FROM t WHERE v=@f";
        assert_eq!(tokens(sql, &MssqlFormat), vec!["@f"]);
    }

    #[test]
    fn skips_dollar_quoted_bodies() {
        let sql = "SELECT $fn$ @inside $fn$, @outside";
        assert_eq!(tokens(sql, &PostgresFormat), vec!["@outside"]);
    }

    #[test]
    fn ignores_casts_and_globals() {
        assert_eq!(tokens("SELECT a::int, :b", &SqliteFormat), vec![":b"]);
        assert_eq!(tokens("SELECT @@ROWCOUNT, @x", &MssqlFormat), vec!["@x"]);
        assert_eq!(tokens("SELECT 'a''@b', x@y, @z", &MssqlFormat), vec!["@z"]);
    }

    #[test]
    fn mysql_hash_comments_and_backslash_escapes_hide_tokens() {
        let sql = "SELECT 'it\\'s @a', @b # @c\nFROM t WHERE v=@d";
        assert_eq!(tokens(sql, &MysqlFormat), vec!["@b", "@d"]);
        // elsewhere `#` and backslashes carry no meaning to the scanner
        assert_eq!(tokens("SELECT @a #> '{x}', '\\' , @b", &MssqlFormat), vec!["@a", "@b"]);
    }

    #[test]
    fn positional_rendering_reuses_positions() {
        let mut command = Command::new("UPDATE t SET a=@a WHERE id=@id OR parent=@id");
        command.add_parameter(CommandParameter::new("@a", RowValues::Int(5)));
        command.add_parameter(CommandParameter::new("@id", RowValues::Int(9)));

        let (sql, values) = bind_positional(&command, &PostgresFormat, PlaceholderStyle::Postgres)
            .unwrap();
        assert_eq!(sql, "UPDATE t SET a=$1 WHERE id=$2 OR parent=$2");
        assert_eq!(values, vec![RowValues::Int(5), RowValues::Int(9)]);

        let (sql, _) =
            bind_positional(&command, &PostgresFormat, PlaceholderStyle::Sqlite).unwrap();
        assert_eq!(sql, "UPDATE t SET a=?1 WHERE id=?2 OR parent=?2");
    }

    #[test]
    fn positional_rendering_flags_undeclared_tokens() {
        let command = Command::new("SELECT * FROM t WHERE a=@missing");
        let err = bind_positional(&command, &PostgresFormat, PlaceholderStyle::Postgres)
            .unwrap_err();
        assert!(matches!(err, SqlBatchError::ConsistencyError(_)));
    }
}
