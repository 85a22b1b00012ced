/// Position tracking for syntax nodes
///
/// Stores the source location of query nodes for editor features
/// like hover, completion and diagnostics.
use serde::{Deserialize, Serialize};
use text_size::{TextRange, TextSize};

/// A span covering a range of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source text.
///
/// `line` and `column` are 1-based, `offset` is a 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if a byte offset falls within this span (end inclusive, for cursors)
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset <= self.end.offset
    }

    /// Check if another span lies entirely within this one
    pub fn contains_span(&self, other: &Span) -> bool {
        other.start.offset >= self.start.offset && other.end.offset <= self.end.offset
    }

    /// Byte range covered by the span
    pub fn range(&self) -> TextRange {
        TextRange::new(
            TextSize::new(self.start.offset as u32),
            TextSize::new(self.end.offset as u32),
        )
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Slice the text this span was computed from
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}
