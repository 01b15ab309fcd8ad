mod error;
mod kind;
mod lexer;


pub use error::*;
pub use kind::TokenKind;
pub use lexer::Tokenizer;

use serde::Serialize;

/// One lexeme. `start..end` is a byte range into the source; `line`/`column` locate
/// `start` and `end_line`/`end_column` locate `end` (both 1-based).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    #[serde(rename = "startOffset")]
    pub start: usize,
    #[serde(rename = "endOffset")]
    pub end: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.line, self.column, self.start)
    }

    pub fn end_position(&self) -> Position {
        Position::new(self.end_line, self.end_column, self.end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_position(), self.end_position())
    }

    /// Width of the covered source in characters.
    pub fn char_len(&self, source: &str) -> usize {
        source.get(self.start..self.end).map_or(self.text.chars().count(), |s| s.chars().count())
    }
}

/// Tokenize `source`; fails only on an unterminated string literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::tokenize(source)
}
