//! Statement separator resolution

use crate::config::ScriptConfig;
use crate::error::Result;
use crate::script::scanner::contains_sql_script_delimiters;
use crate::script::splitter::split_sql_script;
use crate::script::{
    DEFAULT_STATEMENT_SEPARATOR, EOF_STATEMENT_SEPARATOR, FALLBACK_STATEMENT_SEPARATOR,
};

/// Pick the separator to split `script` with.
///
/// The EOF sentinel is returned untouched. An unset separator means `;`, and
/// a separator that never occurs outside quotes falls back to a newline.
pub fn resolve_separator<'a>(script: &str, configured: Option<&'a str>) -> &'a str {
    let separator = configured.unwrap_or(DEFAULT_STATEMENT_SEPARATOR);

    if separator != EOF_STATEMENT_SEPARATOR && !contains_sql_script_delimiters(script, separator) {
        return FALLBACK_STATEMENT_SEPARATOR;
    }

    separator
}

/// Resolve the separator for `script` and split it into statements
pub fn split_statements(
    script: &str,
    resource: Option<&str>,
    config: &ScriptConfig,
) -> Result<Vec<String>> {
    let separator = resolve_separator(script, config.separator.as_deref());

    split_sql_script(
        resource,
        script,
        separator,
        &config.comment_prefix,
        &config.block_comment_start,
        &config.block_comment_end,
    )
}
