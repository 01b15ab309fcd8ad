use super::{LintContext, LintPass};
use crate::{
    diagnostic::{Diagnostic, DiagnosticCode},
    token::{Span, Token, TokenKind},
};

/// Two-operator spellings that are real operators when split by whitespace.
const VALID_PAIRS: &[&str] = &[":=", ">=", "<=", "!=", "==", "**", "!~", "~="];

fn is_sequence_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Multiply
            | TokenKind::Divide
            | TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::LessEqual
            | TokenKind::GreaterEqual
            | TokenKind::Assign
    )
}

fn starts_operand(kind: Option<TokenKind>) -> bool {
    matches!(
        kind,
        Some(TokenKind::Number | TokenKind::Identifier | TokenKind::BuiltinVar | TokenKind::LParen)
    )
}

fn starts_statement(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(token) => matches!(token.kind, TokenKind::Newline | TokenKind::LBrace | TokenKind::Hotkey),
    }
}

/// Adjacent-token checks: operator pairs, v1 `=` assignment and bare `if`.
pub(super) struct SequencePass;

impl LintPass for SequencePass {
    fn name(&self) -> &'static str {
        "sequences"
    }

    fn check(&self, cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let tokens = cx.tokens;
        for (i, pair) in tokens.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);

            if is_sequence_operator(current.kind) && is_sequence_operator(next.kind) {
                let unary_minus = next.kind == TokenKind::Minus && starts_operand(tokens.get(i + 2).map(|t| t.kind));
                let combined = format!("{}{}", current.text, next.text);
                if !unary_minus && !VALID_PAIRS.contains(&combined.as_str()) {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticCode::InvalidOperatorSequence,
                        format!("Invalid operator sequence '{} {}'", current.text, next.text),
                        Span::new(current.start_position(), next.end_position()),
                    ));
                }
            }

            if current.kind == TokenKind::Identifier
                && next.kind == TokenKind::Equals
                && starts_statement(i.checked_sub(1).map(|p| &tokens[p]))
            {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::UseAssignmentOperator,
                    "Use ':=' for assignment; '=' only compares in v2",
                    next.span(),
                ));
            }

            if current.kind == TokenKind::If && next.kind == TokenKind::Newline {
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::IncompleteIfStatement,
                    "Incomplete if statement: missing condition",
                    current.span(),
                ));
            }
        }
    }
}
