use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;

use crate::token::SkippedSpan;

/// Statement-level recursive-descent parser over a filtered token stream
/// (comments removed, newlines kept as separators).
pub struct StmtParser<'a> {
    pub(crate) tokens: Vec<&'a Token>,
    pub(crate) pos: usize,
    pub(crate) len: usize,
    pub(crate) source: &'a str,
    pub(crate) depth: usize,
    pub(crate) skipped: Vec<SkippedSpan>,
}

/// Stand-in terminator for token slices that were not produced by the tokenizer.
static FALLBACK_EOF: Lazy<Token> = Lazy::new(|| Token {
    kind: TokenKind::Eof,
    text: String::new(),
    line: 1,
    column: 1,
    end_line: 1,
    end_column: 1,
    start: 0,
    end: 0,
});

/// Deepest statement and expression nesting accepted before the construct is rejected.
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

impl<'a> StmtParser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        let mut filtered: Vec<&'a Token> = tokens.iter().filter(|t| t.kind != TokenKind::Comment).collect();
        if filtered.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            filtered.push(&*FALLBACK_EOF);
        }
        let len = filtered.len();
        Self {
            tokens: filtered,
            pos: 0,
            len,
            source,
            depth: 0,
            skipped: Vec::new(),
        }
    }
}

mod blocks;
mod control;
mod declarations;
mod expressions;
mod helpers;
mod program;
