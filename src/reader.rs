use crate::error::AnalyzerError;
use std::path::Path;

/// Read every line of the log into memory, in file order.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. A missing or unreadable file
/// (including one that is not valid UTF-8) fails the whole read; no partial
/// result is returned.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, AnalyzerError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AnalyzerError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    let lines = split_lines(&contents);

    tracing::info!(path = %path.display(), lines = lines.len(), "log file loaded");
    Ok(lines)
}

/// Split on any of `\r\n`, `\n` or `\r`. A trailing terminator does not
/// start an extra empty line.
fn split_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = contents;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(rest[..end].to_string());
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }
    lines
}
