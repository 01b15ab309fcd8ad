use super::{StmtParser, helpers::PResult};
use crate::{
    ast::{ClassDeclaration, DirectiveStatement, ExpressionStatement, FunctionDeclaration, HotkeyStatement, Param, Stmt},
    token::TokenKind,
};

impl<'a> StmtParser<'a> {
    /// `[static] IDENT (` whose matching `)` is followed, after optional newlines, by `{`.
    pub(super) fn at_function_declaration(&self) -> bool {
        let mut i = self.pos;
        if self.kind_at(i) == Some(TokenKind::Static) {
            i += 1;
        }
        if self.kind_at(i) != Some(TokenKind::Identifier) || self.kind_at(i + 1) != Some(TokenKind::LParen) {
            return false;
        }

        let mut depth = 0usize;
        let mut j = i + 1;
        loop {
            match self.kind_at(j) {
                Some(TokenKind::LParen) => depth += 1,
                Some(TokenKind::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof) | None => return false,
                _ => {}
            }
            j += 1;
        }

        j += 1;
        while self.kind_at(j) == Some(TokenKind::Newline) {
            j += 1;
        }
        self.kind_at(j) == Some(TokenKind::LBrace)
    }

    pub(super) fn parse_function_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek();
        let is_static = self.eat(TokenKind::Static);
        let name_token = self.expect_id("function name")?;
        self.expect_token(TokenKind::LParen, "'(' after function name")?;

        let mut params = Vec::new();
        self.skip_newlines();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                self.skip_newlines();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }
        self.expect_token(TokenKind::RParen, "')' after parameters")?;
        self.skip_newlines();
        let body = self.parse_block()?;

        Ok(Stmt::Function(FunctionDeclaration {
            name: name_token.text.clone(),
            name_span: name_token.span(),
            params,
            body,
            is_static,
            span: self.span_from(start),
        }))
    }

    /// `[&]name[*] [:= default]`
    fn parse_param(&mut self) -> PResult<Param> {
        let start = self.peek();
        let by_ref = self.eat(TokenKind::Ampersand);
        let name = self.expect_id("parameter name")?.text.clone();
        let variadic = self.eat(TokenKind::Multiply);
        let default = if self.eat(TokenKind::Assign) {
            Some(self.nested(|p| p.parse_or())?)
        } else {
            None
        };
        Ok(Param {
            name,
            by_ref,
            variadic,
            default,
            span: self.span_from(start),
        })
    }

    /// `class Name [extends Base] { ... }`
    pub(super) fn parse_class_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let name_token = self.expect_id("class name")?;
        let super_class = if self.peek().kind == TokenKind::Identifier && self.peek().text.eq_ignore_ascii_case("extends") {
            self.advance();
            Some(self.expect_id("base class name after 'extends'")?.text.clone())
        } else {
            None
        };
        self.skip_newlines();
        let body = self.parse_block()?;

        Ok(Stmt::Class(ClassDeclaration {
            name: name_token.text.clone(),
            name_span: name_token.span(),
            super_class,
            body,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_hotkey_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let trigger = start.text.clone();

        let body = if self.check_past_newlines(TokenKind::LBrace) {
            self.skip_newlines();
            self.parse_block()?
        } else if self.eof() || self.check(TokenKind::Newline) {
            // Trigger alone on its line: the body runs to the next terminator.
            self.parse_until_terminator(true)
        } else {
            // Single-line action.
            self.statement().into_iter().collect()
        };

        Ok(Stmt::Hotkey(HotkeyStatement {
            trigger,
            body,
            span: self.span_from(start),
        }))
    }

    /// `#Name rest of line`; the value is the raw trimmed text after the name.
    pub(super) fn parse_directive_stmt(&mut self) -> PResult<Stmt> {
        let start = self.advance();
        let mut value_start = None;
        let mut value_end = start.end;
        while !self.eof() && !self.check(TokenKind::Newline) {
            let token = self.advance();
            value_start.get_or_insert(token.start);
            value_end = token.end;
        }
        let value = match value_start {
            Some(from) => self.source.get(from..value_end).unwrap_or_default().trim().to_string(),
            None => String::new(),
        };

        Ok(Stmt::Directive(DirectiveStatement {
            directive: start.text.clone(),
            value,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_expression_stmt(&mut self) -> PResult<Stmt> {
        let expression = self.expression()?;
        let span = expression.span();
        Ok(Stmt::Expression(ExpressionStatement { expression, span }))
    }
}
