use super::{StmtParser, helpers::PResult};
use crate::{
    ast::{Alternate, ForStatement, IfStatement, LoopStatement, ReturnStatement, Stmt, WhileStatement},
    token::TokenKind,
};

impl<'a> StmtParser<'a> {
    pub(super) fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        Ok(Stmt::If(self.parse_if_chain()?))
    }

    /// `if`/`elseif` link: the keyword is the current token. Later links nest as
    /// the `alternate` of the previous one.
    fn parse_if_chain(&mut self) -> PResult<IfStatement> {
        let start = self.advance();
        let test = self.expression()?;
        let consequent = self.parse_body()?;

        let alternate = if self.check_past_newlines(TokenKind::ElseIf) {
            self.skip_newlines();
            Some(Alternate::ElseIf(Box::new(self.nested(|p| p.parse_if_chain())?)))
        } else if self.check_past_newlines(TokenKind::Else) {
            self.skip_newlines();
            self.advance();
            if self.check(TokenKind::If) {
                Some(Alternate::ElseIf(Box::new(self.nested(|p| p.parse_if_chain())?)))
            } else {
                Some(Alternate::Else(self.parse_body()?))
            }
        } else {
            None
        };

        Ok(IfStatement {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    pub(super) fn parse_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let test = self.expression()?;
        let body = self.parse_body()?;
        Ok(Stmt::While(WhileStatement {
            test,
            body,
            span: self.span_from(start),
        }))
    }

    /// `for [(] a [, b] in expr [)] body`
    pub(super) fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let parenthesized = self.eat(TokenKind::LParen);

        let mut variables = vec![self.expect_id("loop variable after 'for'")?.text.clone()];
        while self.eat(TokenKind::Comma) {
            variables.push(self.expect_id("loop variable")?.text.clone());
        }
        self.expect_token(TokenKind::In, "'in' in for loop")?;
        let iterable = self.expression()?;
        if parenthesized {
            self.expect_token(TokenKind::RParen, "')' after for header")?;
        }

        let body = self.parse_body()?;
        Ok(Stmt::For(ForStatement {
            variables,
            iterable,
            body,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_loop_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let count = if self.eof() || self.check(TokenKind::Newline) || self.check(TokenKind::LBrace) {
            None
        } else {
            Some(self.expression()?)
        };
        let body = self.parse_body()?;
        Ok(Stmt::Loop(LoopStatement {
            count,
            body,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_return_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let argument = if self.eof() || self.check(TokenKind::Newline) || self.check(TokenKind::RBrace) {
            None
        } else {
            Some(self.expression()?)
        };
        Ok(Stmt::Return(ReturnStatement {
            argument,
            span: self.span_from(start),
        }))
    }
}
