use super::{StmtParser, helpers::PResult};
use crate::{
    ast::{Program, Stmt},
    token::{Position, SkippedSpan, Span, TokenKind},
};

impl<'a> StmtParser<'a> {
    /// Parse the whole token stream. Never fails: a statement that does not parse is
    /// dropped from the body and reported as a [`SkippedSpan`].
    pub fn parse_program(&mut self) -> (Program, Vec<SkippedSpan>) {
        let mut body = Vec::new();

        while !self.eof() {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            if let Some(stmt) = self.statement() {
                body.push(stmt);
            }
        }

        let end = self.tokens[self.len - 1].end_position();
        let skipped = std::mem::take(&mut self.skipped);
        tracing::debug!(statements = body.len(), skipped = skipped.len(), "parsed program");
        (
            Program {
                body,
                span: Span::new(Position::start(), end),
            },
            skipped,
        )
    }

    /// Parse one statement, recovering in panic mode on failure.
    pub(super) fn statement(&mut self) -> Option<Stmt> {
        let first = self.peek();
        match self.nested(|p| p.parse_statement()) {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.synchronize();
                let span = self.span_from(first);
                tracing::trace!(error = %err, "dropping statement");
                self.skipped.push(SkippedSpan {
                    span,
                    message: err.message,
                });
                None
            }
        }
    }

    pub fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.peek().kind {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Loop => self.parse_loop_stmt(),
            TokenKind::Class => self.parse_class_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => {
                let token = self.advance();
                Ok(Stmt::Break { span: token.span() })
            }
            TokenKind::Continue => {
                let token = self.advance();
                Ok(Stmt::Continue { span: token.span() })
            }
            TokenKind::Hotkey => self.parse_hotkey_stmt(),
            TokenKind::Directive => self.parse_directive_stmt(),
            TokenKind::Static | TokenKind::Identifier if self.at_function_declaration() => self.parse_function_stmt(),
            _ => self.parse_expression_stmt(),
        }
    }

    /// Skip at least one token, then stop after a newline or before a token that
    /// starts a new statement.
    pub(super) fn synchronize(&mut self) {
        self.advance();
        while !self.eof() {
            if self.previous().kind == TokenKind::Newline {
                return;
            }
            match self.peek().kind {
                TokenKind::Class | TokenKind::If | TokenKind::While | TokenKind::For | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }
}
