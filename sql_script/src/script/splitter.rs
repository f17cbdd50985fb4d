//! Statement splitter
//!
//! Splits a SQL script into separate statements on a separator, dropping line
//! and block comments and collapsing runs of whitespace into one space.

use crate::error::{Error, Result};
use crate::script::scanner::{ScanState, Step};
use crate::script::{
    DEFAULT_BLOCK_COMMENT_END_DELIMITER, DEFAULT_BLOCK_COMMENT_START_DELIMITER,
    DEFAULT_COMMENT_PREFIX,
};

/// Split a script using the default comment prefix and block comment delimiters
pub fn split_sql_script_default(script: &str, separator: &str) -> Result<Vec<String>> {
    split_sql_script(
        None,
        script,
        separator,
        DEFAULT_COMMENT_PREFIX,
        DEFAULT_BLOCK_COMMENT_START_DELIMITER,
        DEFAULT_BLOCK_COMMENT_END_DELIMITER,
    )
}

/// Split a SQL script into separate statements delimited by `separator`.
///
/// Text from `comment_prefix` to the end of the line is omitted, as is
/// anything enclosed between `block_comment_start` and `block_comment_end`.
/// Separators and comment delimiters inside single- or double-quoted
/// literals, or directly after a backslash, are ordinary text.
///
/// `resource` only names the script in error messages. An unterminated block
/// comment fails the whole split with [`Error::ScriptParse`].
pub fn split_sql_script(
    resource: Option<&str>,
    script: &str,
    separator: &str,
    comment_prefix: &str,
    block_comment_start: &str,
    block_comment_end: &str,
) -> Result<Vec<String>> {
    if script.trim().is_empty() {
        return Err(Error::Config("'script' must not be empty".to_string()));
    }
    if separator.is_empty() {
        return Err(Error::Config("'separator' must not be empty".to_string()));
    }
    if comment_prefix.trim().is_empty() {
        return Err(Error::Config("'comment_prefix' must not be empty".to_string()));
    }
    if block_comment_start.trim().is_empty() || block_comment_end.trim().is_empty() {
        return Err(Error::Config(
            "block comment delimiters must not be empty".to_string(),
        ));
    }

    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::new();
    let mut i = 0;

    while let Some(c) = script[i..].chars().next() {
        let rest = &script[i..];

        if state.advance(c) != Step::Plain || !state.is_unquoted() {
            current.push(c);
            i += c.len_utf8();
            continue;
        }

        if rest.starts_with(separator) {
            if !current.is_empty() {
                statements.push(std::mem::take(&mut current));
            }
            i += separator.len();
            continue;
        }

        if rest.starts_with(comment_prefix) {
            // Skip the comment along with its line break
            match rest.find('\n') {
                Some(offset) if offset > 0 => {
                    i += offset + 1;
                    continue;
                }
                // No line break left: the comment runs to the end of the script
                _ => break,
            }
        }

        if rest.starts_with(block_comment_start) {
            match rest.find(block_comment_end) {
                Some(offset) if offset > 0 => {
                    i += offset + block_comment_end.len();
                    continue;
                }
                _ => {
                    return Err(Error::ScriptParse {
                        message: format!(
                            "Missing block comment end delimiter: {}",
                            block_comment_end
                        ),
                        resource: resource.map(str::to_string),
                    });
                }
            }
        }

        if matches!(c, ' ' | '\r' | '\n' | '\t') {
            if !current.is_empty() && !current.ends_with(' ') {
                current.push(' ');
            }
            i += c.len_utf8();
            continue;
        }

        current.push(c);
        i += c.len_utf8();
    }

    if !current.trim().is_empty() {
        statements.push(current);
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::EOF_STATEMENT_SEPARATOR;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(script: &str, separator: &str) -> Vec<String> {
        split_sql_script_default(script, separator).unwrap()
    }

    #[rstest]
    #[case("SELECT 1; SELECT 2; SELECT 3")]
    #[case("CREATE TABLE a (id INT);INSERT INTO a VALUES (1);")]
    #[case("DELETE FROM a;\n\tDELETE FROM b;\n")]
    fn test_plain_statements_match_naive_split(#[case] script: &str) {
        let naive: Vec<String> = script
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        assert_eq!(split(script, ";"), naive);
    }

    #[test]
    fn test_separator_inside_single_quotes() {
        assert_eq!(
            split("INSERT INTO t VALUES ('a;b');", ";"),
            vec!["INSERT INTO t VALUES ('a;b')"]
        );
    }

    #[test]
    fn test_separator_inside_double_quotes() {
        assert_eq!(
            split("SELECT \"odd;name\" FROM t; SELECT 2", ";"),
            vec!["SELECT \"odd;name\" FROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_mixed_quotes_do_not_close_each_other() {
        assert_eq!(
            split("SELECT 'it\"s;'; SELECT \"a'b;\";", ";"),
            vec!["SELECT 'it\"s;'", "SELECT \"a'b;\""]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close_literal() {
        assert_eq!(
            split("SELECT '\\''; SELECT 2;", ";"),
            vec!["SELECT '\\''", "SELECT 2"]
        );
    }

    #[test]
    fn test_escaped_separator_is_text() {
        assert_eq!(split("SELECT a\\;b; SELECT 2", ";"), vec!["SELECT a\\;b", "SELECT 2"]);
    }

    #[test]
    fn test_block_comments_are_removed() {
        assert_eq!(
            split("SELECT 1 /* comment; with ; separators */; SELECT 2;", ";"),
            vec!["SELECT 1 ", "SELECT 2"]
        );
    }

    #[test]
    fn test_multi_line_block_comment() {
        let script = "/* header\n * spans lines; really\n */\nCREATE TABLE t (id INT);\n/* trailer */";

        assert_eq!(split(script, ";"), vec!["CREATE TABLE t (id INT)"]);
    }

    #[test]
    fn test_unterminated_block_comment_fails() {
        let error = split_sql_script(
            Some("broken.sql"),
            "SELECT 1 /* oops",
            ";",
            "--",
            "/*",
            "*/",
        )
        .unwrap_err();

        match error {
            Error::ScriptParse { message, resource } => {
                assert_eq!(message, "Missing block comment end delimiter: */");
                assert_eq!(resource.as_deref(), Some("broken.sql"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_line_comments_are_removed() {
        let script = "SELECT 1; -- first\nSELECT 2; -- second\n-- trailing";

        assert_eq!(split(script, ";"), vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_comment_markers_inside_literals_are_kept() {
        assert_eq!(
            split("INSERT INTO t VALUES ('--not a comment', '/* nor this */');", ";"),
            vec!["INSERT INTO t VALUES ('--not a comment', '/* nor this */')"]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(split("SELECT   1\n\nFROM   t;", ";"), vec!["SELECT 1 FROM t"]);
        assert_eq!(
            split("SELECT   1\n\nFROM   t;", EOF_STATEMENT_SEPARATOR),
            vec!["SELECT 1 FROM t;"]
        );
    }

    #[test]
    fn test_whitespace_inside_literals_is_kept() {
        assert_eq!(
            split("INSERT INTO t VALUES ('a\n\n  b');", ";"),
            vec!["INSERT INTO t VALUES ('a\n\n  b')"]
        );
    }

    #[test]
    fn test_newline_separator() {
        assert_eq!(
            split("INSERT INTO t VALUES (1)\nINSERT INTO t VALUES (2)\n\n", "\n"),
            vec!["INSERT INTO t VALUES (1)", "INSERT INTO t VALUES (2)"]
        );
    }

    #[test]
    fn test_multi_character_separator() {
        assert_eq!(
            split("CREATE PROCEDURE p() BEGIN SELECT 1; END @@ CALL p() @@", "@@"),
            vec!["CREATE PROCEDURE p() BEGIN SELECT 1; END ", "CALL p() "]
        );
    }

    #[test]
    fn test_custom_comment_delimiters() {
        let statements =
            split_sql_script(None, "# note\nSELECT 1; { gone; } SELECT 2;", ";", "#", "{", "}")
                .unwrap();

        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(
            split("INSERT INTO t VALUES ('héllo; wörld'); SELECT 'ü'", ";"),
            vec!["INSERT INTO t VALUES ('héllo; wörld')", "SELECT 'ü'"]
        );
    }

    #[test]
    fn test_blank_script_is_rejected() {
        assert!(matches!(
            split_sql_script_default("  \n ", ";"),
            Err(Error::Config(_))
        ));
    }
}
