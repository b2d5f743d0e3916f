use std::fmt;

/// A 0-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 0-based line number
    pub line: usize,
    /// 0-based column (character offset within the line)
    pub column: usize,
    /// 0-based absolute byte offset from the start of input
    pub offset: usize,
}

impl Position {
    /// Compute the line/column of byte `offset` in `input`.
    pub fn at(input: &str, offset: usize) -> Self {
        let consumed = &input[..offset];
        let line = consumed.matches('\n').count();
        let last_newline = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Position {
            line,
            column: consumed[last_newline..].chars().count(),
            offset,
        }
    }
}

/// Why a string could not be parsed as a complete reference path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub code: String,
    pub message: String,
    /// Start of the offending region
    pub begin: Position,
    /// End of the offending region (exclusive)
    pub end: Position,
}

impl PathError {
    pub fn no_match(input: &str) -> Self {
        let pos = Position::at(input, 0);
        PathError {
            code: "path-no-match".to_string(),
            message: "Expected an identifier at the start of the path".to_string(),
            begin: pos,
            end: pos,
        }
    }

    /// `begin..end` are byte offsets of the unconsumed text in `input`.
    pub fn trailing_input(input: &str, begin: usize, end: usize) -> Self {
        PathError {
            code: "path-trailing-input".to_string(),
            message: format!("Unexpected input after path: {}", &input[begin..end]),
            begin: Position::at(input, begin),
            end: Position::at(input, end),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(
                f,
                "{}:{}: {} ({})",
                self.begin.line, self.begin.column, self.message, self.code
            )
        } else {
            write!(
                f,
                "{}:{}-{}:{}: {} ({})",
                self.begin.line,
                self.begin.column,
                self.end.line,
                self.end.column,
                self.message,
                self.code
            )
        }
    }
}

impl std::error::Error for PathError {}
