//! Quote and escape tracking shared by the splitter and the delimiter check

/// What the scanner made of the character it was just fed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A backslash that escapes the next character
    EscapeStart,
    /// The character following a backslash, taken literally
    Escaped,
    /// Any other character, quote toggles already applied
    Plain,
}

/// Per-parse quoting state. Created fresh for every script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub in_single_quote: bool,
    pub in_double_quote: bool,
    pub in_escape: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next character of the script.
    ///
    /// Backslashes escape the following character MySQL style: the escaped
    /// character never toggles a quote or starts a delimiter.
    pub fn advance(&mut self, c: char) -> Step {
        if self.in_escape {
            self.in_escape = false;
            return Step::Escaped;
        }
        if c == '\\' {
            self.in_escape = true;
            return Step::EscapeStart;
        }
        if !self.in_double_quote && c == '\'' {
            self.in_single_quote = !self.in_single_quote;
        } else if !self.in_single_quote && c == '"' {
            self.in_double_quote = !self.in_double_quote;
        }
        Step::Plain
    }

    /// Delimiters are only recognised outside both kinds of quotes
    pub fn is_unquoted(&self) -> bool {
        !self.in_single_quote && !self.in_double_quote
    }
}

/// Does the script contain `delim` outside of single-quoted literals?
///
/// Only single quotes are tracked as literals here; a delimiter inside a
/// double-quoted identifier still counts as present. The splitter itself
/// honours both quote kinds.
///
/// Backslash escapes are honoured too, which makes this stricter than a bare
/// single-quote toggle: an escaped quote does not close the literal and an
/// escaped character never starts a delimiter. The escape rule is kept on
/// purpose to agree with the splitter (see DESIGN.md, "Presence-check
/// asymmetry").
pub fn contains_sql_script_delimiters(script: &str, delim: &str) -> bool {
    if delim.is_empty() {
        return false;
    }

    let mut in_literal = false;
    let mut in_escape = false;

    for (i, c) in script.char_indices() {
        if in_escape {
            in_escape = false;
            continue;
        }
        if c == '\\' {
            in_escape = true;
            continue;
        }
        if c == '\'' {
            in_literal = !in_literal;
        }
        if !in_literal && script[i..].starts_with(delim) {
            return true;
        }
    }

    false
}
