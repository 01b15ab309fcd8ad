use super::{StmtParser, helpers::PResult};
use crate::{
    ast::{BinaryOp, Expr, LiteralValue, UnaryOp},
    token::{Token, TokenKind},
};

fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().to(&right.span());
    Expr::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

fn number_value(text: &str) -> f64 {
    match text.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16).map(|v| v as f64).unwrap_or(0.0),
        None => text.parse().unwrap_or(0.0),
    }
}

impl<'a> StmtParser<'a> {
    pub(super) fn expression(&mut self) -> PResult<Expr> {
        self.nested(|p| p.parse_assignment())
    }

    /// `target := value`, right-associative.
    fn parse_assignment(&mut self) -> PResult<Expr> {
        let target = self.parse_or()?;
        if !self.check(TokenKind::Assign) {
            return Ok(target);
        }
        if !matches!(target, Expr::Identifier { .. } | Expr::Member { .. }) {
            return Err(self.err("Invalid assignment target"));
        }
        self.advance();
        let value = self.nested(|p| p.parse_assignment())?;
        let span = target.span().to(&value.span());
        Ok(Expr::Assignment {
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    pub(super) fn parse_or(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_and()?;
            while p.eat(TokenKind::Or) {
                p.link()?;
                let right = p.parse_and()?;
                left = binary(BinaryOp::Or, left, right);
            }
            Ok(left)
        })
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_equality()?;
            while p.eat(TokenKind::And) {
                p.link()?;
                let right = p.parse_equality()?;
                left = binary(BinaryOp::And, left, right);
            }
            Ok(left)
        })
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_comparison()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Equals => BinaryOp::Equal,
                    TokenKind::NotEquals => BinaryOp::NotEqual,
                    _ => break,
                };
                p.advance();
                p.link()?;
                let right = p.parse_comparison()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_term()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Less => BinaryOp::Less,
                    TokenKind::Greater => BinaryOp::Greater,
                    TokenKind::LessEqual => BinaryOp::LessEqual,
                    TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                    _ => break,
                };
                p.advance();
                p.link()?;
                let right = p.parse_term()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_factor()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Subtract,
                    _ => break,
                };
                p.advance();
                p.link()?;
                let right = p.parse_factor()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut left = p.parse_unary()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Multiply => BinaryOp::Multiply,
                    TokenKind::Divide => BinaryOp::Divide,
                    TokenKind::Modulo => BinaryOp::Modulo,
                    _ => break,
                };
                p.advance();
                p.link()?;
                let right = p.parse_unary()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let operator = match self.peek().kind {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            _ => return self.parse_postfix(),
        };
        let start = self.advance();
        let argument = self.nested(|p| p.parse_unary())?;
        let span = start.span().to(&argument.span());
        Ok(Expr::Unary {
            operator,
            argument: Box::new(argument),
            span,
        })
    }

    /// Call and member chain: `f(a)(b)`, `obj.name.other(x)`.
    fn parse_postfix(&mut self) -> PResult<Expr> {
        self.chain(|p| {
            let mut expr = p.parse_primary()?;
            loop {
                if p.eat(TokenKind::LParen) {
                    p.link()?;
                    let arguments = p.parse_arguments()?;
                    let span = expr.span().to(&p.previous().span());
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                        span,
                    };
                } else if p.eat(TokenKind::Dot) {
                    p.link()?;
                    let name = match p.peek().kind {
                        TokenKind::Identifier | TokenKind::BuiltinVar => p.advance(),
                        _ => return Err(p.err("Expected property name after '.'")),
                    };
                    let span = expr.span().to(&name.span());
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: name.text.clone(),
                        span,
                    };
                } else {
                    break;
                }
            }
            Ok(expr)
        })
    }

    /// Arguments after a consumed `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> PResult<Vec<Expr>> {
        let mut arguments = Vec::new();
        self.skip_newlines();
        if !self.check(TokenKind::RParen) {
            loop {
                arguments.push(self.expression()?);
                self.skip_newlines();
                if !self.eat(TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
        }
        self.expect_token(TokenKind::RParen, "')' after arguments")?;
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let token = self.peek();
        let expr = match token.kind {
            TokenKind::True => literal(token, LiteralValue::Boolean(true)),
            TokenKind::False => literal(token, LiteralValue::Boolean(false)),
            TokenKind::Null => literal(token, LiteralValue::Null),
            TokenKind::Number => literal(token, LiteralValue::Number(number_value(&token.text))),
            TokenKind::String => {
                let inner = token
                    .text
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(&token.text);
                literal(token, LiteralValue::String(inner.to_string()))
            }
            TokenKind::Identifier | TokenKind::BuiltinVar => Expr::Identifier {
                name: token.text.clone(),
                builtin: token.kind == TokenKind::BuiltinVar,
                span: token.span(),
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect_token(TokenKind::RParen, "')' after expression")?;
                return Ok(inner);
            }
            _ => return Err(self.err("Expected expression")),
        };
        self.advance();
        Ok(expr)
    }
}

fn literal(token: &Token, value: LiteralValue) -> Expr {
    Expr::Literal {
        value,
        raw: token.text.clone(),
        span: token.span(),
    }
}
