pub mod ast;
pub mod error;
pub mod json;
pub mod scanner;

pub use ast::{is_identifier, Key, ReferencePath};
pub use error::{PathError, Position};
pub use scanner::{scan, scan_with, ScanOptions};

// ── Strict parsing ─────────────────────────────────────────────────

/// Parse `input` as a complete reference path.
///
/// Unlike [`scan`], which returns the longest matching prefix, this fails
/// unless the whole input (up to trailing whitespace) is a path.
pub fn parse_path(input: &str) -> Result<ReferencePath, PathError> {
    let path = scan(input).ok_or_else(|| PathError::no_match(input))?;
    let rest = &input[path.end()..];
    let trimmed = rest.trim_end();
    if !trimmed.is_empty() {
        let begin = path.end() + (rest.len() - rest.trim_start().len());
        let end = path.end() + trimmed.len();
        return Err(PathError::trailing_input(input, begin, end));
    }
    Ok(path)
}
