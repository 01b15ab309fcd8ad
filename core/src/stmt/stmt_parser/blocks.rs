use super::{StmtParser, helpers::PResult};
use crate::{ast::Stmt, token::TokenKind};

impl<'a> StmtParser<'a> {
    /// Body of a compound statement: a braced block, or statements up to a terminator.
    pub(super) fn parse_body(&mut self) -> PResult<Vec<Stmt>> {
        if self.check_past_newlines(TokenKind::LBrace) {
            self.skip_newlines();
            return self.parse_block();
        }
        Ok(self.parse_until_terminator(false))
    }

    /// `{ statement* }`
    pub(super) fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect_token(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.eof() || self.check(TokenKind::RBrace) {
                break;
            }
            if let Some(stmt) = self.statement() {
                body.push(stmt);
            }
        }
        self.expect_token(TokenKind::RBrace, "'}' to close block")?;
        Ok(body)
    }

    /// Statements until end of input, `}`, `else` or `elseif` (and, for hotkey
    /// bodies, the next hotkey).
    pub(super) fn parse_until_terminator(&mut self, stop_at_hotkey: bool) -> Vec<Stmt> {
        let mut body = Vec::new();
        loop {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            if self.eof() {
                break;
            }
            match self.peek().kind {
                TokenKind::RBrace | TokenKind::Else | TokenKind::ElseIf => break,
                TokenKind::Hotkey if stop_at_hotkey => break,
                _ => {}
            }
            if let Some(stmt) = self.statement() {
                body.push(stmt);
            }
        }
        body
    }
}
