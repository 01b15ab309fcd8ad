use serde::Serialize;
use std::fmt;

/// 1-based line/column (columns count characters) plus the byte offset into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn single(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: &Span) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Fatal tokenizer failure. The only one is a string literal that never closes.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn unterminated_string(position: Position) -> Self {
        Self::new("Unterminated string", position)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

/// Grammar violation raised while parsing a single statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(message: String) -> Self {
        Self { message, span: None }
    }

    pub fn with_span(message: String, span: Span) -> Self {
        Self {
            message,
            span: Some(span),
        }
    }

    pub fn with_position(message: String, position: Position) -> Self {
        Self {
            message,
            span: Some(Span::single(position)),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{} at {}", self.message, span)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// A statement dropped by panic-mode recovery: the tokens it covered and why it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSpan {
    pub span: Span,
    pub message: String,
}

/// Helper to convert a byte offset to a line/column position
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Position::new(line, column, offset.min(text.len()))
}

/// Byte offsets of every line start, for repeated offset/line lookups on one text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset where the 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> usize {
        let idx = (line.max(1) - 1) as usize;
        self.starts.get(idx).copied().unwrap_or(self.text.len())
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let idx = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.starts[idx];
        let column = self.text[line_start..offset].chars().count() as u32 + 1;
        Position::new(idx as u32 + 1, column, offset)
    }

    /// Position of a character column (1-based) on a 1-based line.
    pub fn position_at(&self, line: u32, column: u32) -> Position {
        let start = self.line_start(line);
        let rest = &self.text[start..];
        let line_text = &rest[..rest.find('\n').unwrap_or(rest.len())];
        let offset = line_text
            .char_indices()
            .nth((column.max(1) - 1) as usize)
            .map(|(i, _)| start + i)
            .unwrap_or(start + line_text.len());
        Position::new(line.max(1), column.max(1), offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position() {
        let text = "line1\nline2\nline3";

        assert_eq!(offset_to_position(text, 0), Position::new(1, 1, 0));
        assert_eq!(offset_to_position(text, 5), Position::new(1, 6, 5));
        assert_eq!(offset_to_position(text, 6), Position::new(2, 1, 6));
        assert_eq!(offset_to_position(text, 12), Position::new(3, 1, 12));
    }

    #[test]
    fn test_line_index_matches_linear_scan() {
        let text = "a := 1\n\tb := \"é\"\n\nc";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        for offset in text.char_indices().map(|(i, _)| i) {
            assert_eq!(index.position(offset), offset_to_position(text, offset), "offset {offset}");
        }
    }

    #[test]
    fn test_line_index_position_at() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.position_at(2, 2), Position::new(2, 2, 4));
        // Past the end of a line clamps to the line's end.
        assert_eq!(index.position_at(1, 9).offset, 2);
    }

    #[test]
    fn test_span_display() {
        let span1 = Span::new(Position::new(1, 5, 4), Position::new(1, 10, 9));
        assert_eq!(span1.to_string(), "1:5-10");

        let span2 = Span::new(Position::new(1, 5, 4), Position::new(3, 2, 20));
        assert_eq!(span2.to_string(), "1:5-3:2");
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::with_position("syntax error".to_string(), Position::new(2, 10, 15));
        assert_eq!(err.to_string(), "syntax error at 2:10-10");

        let lex = LexError::unterminated_string(Position::new(3, 7, 20));
        assert_eq!(lex.to_string(), "Unterminated string at 3:7");
    }
}
