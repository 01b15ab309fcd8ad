use super::{MAX_NESTING_DEPTH, StmtParser};
use crate::token::{ParseError, Span, Token, TokenKind};

pub(crate) type PResult<T> = Result<T, ParseError>;

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        _ => format!("'{}'", token.text),
    }
}

impl<'a> StmtParser<'a> {
    pub(super) fn eof(&self) -> bool {
        self.pos >= self.len || self.tokens[self.pos].kind == TokenKind::Eof
    }

    pub(super) fn peek(&self) -> &'a Token {
        self.tokens[self.pos.min(self.len - 1)]
    }

    pub(super) fn kind_at(&self, idx: usize) -> Option<TokenKind> {
        self.tokens.get(idx).map(|t| t.kind)
    }

    pub(super) fn previous(&self) -> &'a Token {
        self.tokens[self.pos.saturating_sub(1).min(self.len - 1)]
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token. A no-op at end of input.
    pub(super) fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.eof() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_token(&mut self, kind: TokenKind, what: &str) -> PResult<&'a Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.err(&format!("Expected {}", what)))
        }
    }

    pub(super) fn expect_id(&mut self, what: &str) -> PResult<&'a Token> {
        self.expect_token(TokenKind::Identifier, what)
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Whether the next non-newline token has `kind`, without consuming anything.
    pub(super) fn check_past_newlines(&self, kind: TokenKind) -> bool {
        let mut i = self.pos;
        while self.kind_at(i) == Some(TokenKind::Newline) {
            i += 1;
        }
        self.kind_at(i) == Some(kind)
    }

    pub(super) fn err(&self, msg: &str) -> ParseError {
        let found = self.peek();
        ParseError::with_span(format!("{}, found {}", msg, describe(found)), found.span())
    }

    /// Span from `start` through the last consumed token.
    pub(super) fn span_from(&self, start: &Token) -> Span {
        let last = self.previous();
        if last.end >= start.end {
            Span::new(start.start_position(), last.end_position())
        } else {
            start.span()
        }
    }

    /// Run `f` one level deeper, rejecting runaway nesting.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.err("Construct nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run a left-associative chain parser; every [`Self::link`] taken inside
    /// is released when `f` returns.
    pub(super) fn chain<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// One more link of a left-deep chain counts as one level of nesting.
    pub(super) fn link(&mut self) -> PResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.err("Expression chain too long"));
        }
        self.depth += 1;
        Ok(())
    }
}
