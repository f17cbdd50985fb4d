//! Script module for sql_script
//!
//! This module turns raw SQL script text into an ordered list of statements.

pub mod reader;
pub mod scanner;
pub mod separator;
pub mod source;
pub mod splitter;

/// Default statement separator within SQL scripts
pub const DEFAULT_STATEMENT_SEPARATOR: &str = ";";

/// Separator used when neither the configured nor the default separator
/// occurs in a script
pub const FALLBACK_STATEMENT_SEPARATOR: &str = "\n";

/// Virtual separator marking a script as one single statement. A script
/// should never actually contain this text.
pub const EOF_STATEMENT_SEPARATOR: &str = "^^^ END OF SCRIPT ^^^";

/// Default prefix for single-line comments
pub const DEFAULT_COMMENT_PREFIX: &str = "--";

/// Default start delimiter for block comments
pub const DEFAULT_BLOCK_COMMENT_START_DELIMITER: &str = "/*";

/// Default end delimiter for block comments
pub const DEFAULT_BLOCK_COMMENT_END_DELIMITER: &str = "*/";

// Re-export key functions
pub use reader::{read_script, read_script_from};
pub use scanner::contains_sql_script_delimiters;
pub use separator::{resolve_separator, split_statements};
pub use source::{FileScript, InlineScript, ScriptSource};
pub use splitter::{split_sql_script, split_sql_script_default};
