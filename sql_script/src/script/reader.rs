//! Script reader
//!
//! Builds one script string out of a line-oriented source.

use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::config::ScriptConfig;
use crate::error::{Error, Result};
use crate::script::source::ScriptSource;

/// Read the script behind `source`, honouring the configured comment prefix,
/// separator and block comment end delimiter.
///
/// Any I/O failure, including text that is not valid UTF-8, is reported as
/// [`Error::CannotReadScript`].
pub async fn read_script_from<S>(source: &S, config: &ScriptConfig) -> Result<String>
where
    S: ScriptSource + ?Sized,
{
    let cannot_read = |cause| Error::CannotReadScript {
        resource: source.description(),
        cause,
    };

    let reader = source.open().await.map_err(cannot_read)?;

    read_script(
        reader,
        Some(config.comment_prefix.as_str()),
        config.separator.as_deref(),
        Some(config.block_comment_end.as_str()),
    )
    .await
    .map_err(cannot_read)
}

/// Read a script line by line and join the kept lines with `\n`.
///
/// A line ends at `\n`, `\r\n` or a lone `\r`. Lines *beginning* with the
/// comment prefix are dropped unless they also contain the block comment end
/// delimiter. Comments anywhere else in a line are left for the splitter.
pub async fn read_script<R>(
    mut reader: R,
    comment_prefix: Option<&str>,
    separator: Option<&str>,
    block_comment_end: Option<&str>,
) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;

    let mut script = String::new();
    for line in lines(&text) {
        let closes_block = block_comment_end.map_or(false, |end| line.contains(end));
        let is_code = comment_prefix.map_or(false, |prefix| !line.starts_with(prefix));

        if closes_block || is_code {
            if !script.is_empty() {
                script.push('\n');
            }
            script.push_str(line);
        }
    }

    append_separator_if_necessary(&mut script, separator);
    Ok(script)
}

fn lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = Some(text).filter(|t| !t.is_empty());

    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                let terminator = if current[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[end + terminator..]).filter(|t| !t.is_empty());
                Some(&current[..end])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// When the separator ends in whitespace and the script already ends with the
/// separator's trimmed form, complete it with that whitespace so the last
/// statement is terminated as well.
pub fn append_separator_if_necessary(script: &mut String, separator: Option<&str>) {
    let Some(separator) = separator else {
        return;
    };

    let trimmed = separator.trim();
    if trimmed.len() == separator.len() {
        return;
    }

    if script.ends_with(trimmed) {
        script.push_str(&separator[separator.trim_end().len()..]);
    }
}
