use rustc_hash::FxHashSet;

use super::{LintContext, LintPass, builtins};
use crate::{
    ast::{Expr, Program, Stmt},
    diagnostic::{Diagnostic, DiagnosticCode},
    token::{Token, TokenKind},
};

/// Checks that need the parsed tree. Skipped when lexing failed.
pub(super) struct TreePass;

impl LintPass for TreePass {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn check(&self, cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let Some(program) = cx.program else {
            return;
        };
        check_undefined_calls(program, diagnostics);
        walk_bodies(&program.body, diagnostics);
        check_read_only_assignments(cx.tokens, diagnostics);
    }
}

/// Top-level calls only; nested scopes are not followed.
fn check_undefined_calls(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    let defined: FxHashSet<String> = program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Function(f) => Some(f.name.to_ascii_lowercase()),
            Stmt::Class(c) => Some(c.name.to_ascii_lowercase()),
            _ => None,
        })
        .collect();

    for stmt in &program.body {
        let Stmt::Expression(stmt) = stmt else {
            continue;
        };
        let call = match &stmt.expression {
            Expr::Assignment { value, .. } => value.called_name(),
            other => other.called_name(),
        };
        let Some((name, span)) = call else {
            continue;
        };
        if !defined.contains(&name.to_ascii_lowercase()) && !builtins::is_builtin_function(name) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::UndefinedFunction,
                format!("Undefined function '{}'", name),
                span,
            ));
        }
    }
}

fn walk_bodies(body: &[Stmt], diagnostics: &mut Vec<Diagnostic>) {
    for pair in body.windows(2) {
        if let Stmt::Return(_) = pair[0] {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::UnreachableCode,
                "Unreachable code after return",
                pair[1].span(),
            ));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for stmt in body {
        if let Stmt::Function(f) = stmt {
            if seen.iter().any(|name| name.eq_ignore_ascii_case(&f.name)) {
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::DuplicateFunction,
                    format!("Duplicate function declaration '{}'", f.name),
                    f.name_span,
                ));
            }
            seen.push(&f.name);
        }
    }

    for stmt in body {
        for child in stmt.child_bodies() {
            walk_bodies(child, diagnostics);
        }
    }
}

fn check_read_only_assignments(tokens: &[Token], diagnostics: &mut Vec<Diagnostic>) {
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::BuiltinVar || !builtins::is_read_only_variable(&token.text) {
            continue;
        }
        let next = tokens[i + 1..].iter().find(|t| t.kind != TokenKind::Newline);
        if next.is_some_and(|t| t.kind == TokenKind::Assign) {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::ReadOnlyAssignment,
                format!("Cannot assign to read-only variable '{}'", token.text),
                token.span(),
            ));
        }
    }
}
