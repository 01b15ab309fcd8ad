use super::{LintContext, LintPass};
use crate::{
    diagnostic::{Diagnostic, DiagnosticCode},
    token::{Token, TokenKind},
};

/// Independent stacks for `{}`, `()` and `[]`.
pub(super) struct BracketPass;

impl LintPass for BracketPass {
    fn name(&self) -> &'static str {
        "brackets"
    }

    fn check(&self, cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let mut braces: Vec<&Token> = Vec::new();
        let mut parens: Vec<&Token> = Vec::new();
        let mut brackets: Vec<&Token> = Vec::new();

        for token in cx.tokens {
            let (stack, code, message) = match token.kind {
                TokenKind::LBrace => {
                    braces.push(token);
                    continue;
                }
                TokenKind::LParen => {
                    parens.push(token);
                    continue;
                }
                TokenKind::LBracket => {
                    brackets.push(token);
                    continue;
                }
                TokenKind::RBrace => (&mut braces, DiagnosticCode::UnmatchedBrace, "Unmatched closing brace '}'"),
                TokenKind::RParen => (&mut parens, DiagnosticCode::UnmatchedParen, "Unmatched closing parenthesis ')'"),
                TokenKind::RBracket => (&mut brackets, DiagnosticCode::UnmatchedBracket, "Unmatched closing bracket ']'"),
                _ => continue,
            };
            if stack.pop().is_none() {
                diagnostics.push(Diagnostic::error(code, message, token.span()));
            }
        }

        let leftovers = [(braces, "Unclosed brace '{'"), (parens, "Unclosed parenthesis '('"), (brackets, "Unclosed bracket '['")];
        for (stack, message) in leftovers {
            for open in stack {
                diagnostics.push(Diagnostic::error(DiagnosticCode::UnclosedBracket, message, open.span()));
            }
        }
    }
}
