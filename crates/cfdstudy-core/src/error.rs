use std::fmt;

use thiserror::Error;

/// 1-based position inside a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute the line/column of a byte offset into `src`.
    pub fn of_offset(src: &str, offset: usize) -> Self {
        let offset = offset.min(src.len());
        let before = &src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Structural problem in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", location_prefix(.position), .message)]
pub struct FormatError {
    pub message: String,
    pub position: Option<Position>,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

fn location_prefix(position: &Option<Position>) -> String {
    position.map(|pos| format!("{pos}: ")).unwrap_or_default()
}

/// Top-level error type for catalog loading and formatting.
///
/// A lookup miss is not an error: `resolve` returns `None` instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is structurally invalid.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A template referenced `%N` but fewer than N arguments were supplied.
    #[error("missing argument %{index} for template {template:?}")]
    MissingArgument { index: u8, template: String },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
