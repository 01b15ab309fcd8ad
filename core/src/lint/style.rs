use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{LintContext, LintPass, builtins};
use crate::{
    diagnostic::{Diagnostic, DiagnosticCode},
    token::{LineIndex, Position, Span, Token, TokenKind},
};

static HUNGARIAN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(str|int|bool|obj|arr)[A-Z]").ok());
static PERCENT_VAR: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"%\w+%").ok());
static REQUIRES_V2: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)#Requires\s+AutoHotkey\s+v2").ok());

fn is_match(re: &Lazy<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

/// Naming, layout and best-practice heuristics.
pub(super) struct StylePass;

impl LintPass for StylePass {
    fn name(&self) -> &'static str {
        "style"
    }

    fn check(&self, cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
        check_names(cx, diagnostics);
        check_indentation(cx, diagnostics);
        check_strings(cx.tokens, diagnostics);
        check_loop_depth(cx, diagnostics);
        check_dangerous_calls(cx.tokens, diagnostics);

        if cx.config.require_version_directive && !cx.source.trim().is_empty() && !is_match(&REQUIRES_V2, cx.source) {
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::MissingRequires,
                "Add '#Requires AutoHotkey v2' to declare the target version",
                Span::single(Position::start()),
            ));
        }
    }
}

fn after_dot(tokens: &[Token], i: usize) -> bool {
    i > 0 && tokens[i - 1].kind == TokenKind::Dot
}

/// Each offending name is reported once, at its first occurrence.
fn check_names(cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let mut reported: FxHashSet<&str> = FxHashSet::default();
    for (i, token) in cx.tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier || after_dot(cx.tokens, i) || reported.contains(token.text.as_str()) {
            continue;
        }
        let name = token.text.as_str();

        if is_match(&HUNGARIAN, name) {
            reported.insert(name);
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::HungarianNotation,
                format!("Avoid Hungarian notation in '{}'", name),
                token.span(),
            ));
            continue;
        }

        let single_letter = name.len() == 1 && name.chars().all(|c| c.is_ascii_alphabetic());
        if single_letter && !cx.config.allowed_short_names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            reported.insert(name);
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::ShortVariableName,
                format!("Single-letter name '{}'; prefer a descriptive name", name),
                token.span(),
            ));
        }
    }
}

fn check_indentation(cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let width = cx.config.indent_width;

    // Braces per line, and lines that continue a multi-line token.
    let mut braces: FxHashMap<u32, (usize, usize)> = FxHashMap::default();
    let mut continued: FxHashSet<u32> = FxHashSet::default();
    for token in cx.tokens {
        match token.kind {
            TokenKind::LBrace => braces.entry(token.line).or_default().0 += 1,
            TokenKind::RBrace => braces.entry(token.line).or_default().1 += 1,
            _ => {}
        }
        if token.kind != TokenKind::Newline {
            continued.extend(token.line + 1..=token.end_line);
        }
    }

    let index = LineIndex::new(cx.source);
    let mut level = 0usize;
    for (idx, raw) in cx.source.split('\n').enumerate() {
        let line_no = idx as u32 + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start_matches([' ', '\t']);
        let (opens, closes) = braces.get(&line_no).copied().unwrap_or_default();

        let skip = trimmed.is_empty() || trimmed.starts_with(';') || continued.contains(&line_no);
        if !skip {
            let expected_level = if trimmed.starts_with('}') { level.saturating_sub(1) } else { level };
            let indent = &line[..line.len() - trimmed.len()];
            let found: usize = indent.chars().map(|c| if c == '\t' { width } else { 1 }).sum();
            let expected = expected_level * width;
            // Top-level lines are free: braceless `if` and hotkey bodies indent without a block.
            if expected_level > 0 && found != expected {
                let end_column = indent.chars().count() as u32 + 1;
                diagnostics.push(Diagnostic::info(
                    DiagnosticCode::InconsistentIndentation,
                    format!("Expected {} spaces, found {}", expected, found),
                    Span::new(index.position_at(line_no, 1), index.position_at(line_no, end_column)),
                ));
            }
        }

        level = (level + opens).saturating_sub(closes);
    }
}

fn check_strings(tokens: &[Token], diagnostics: &mut Vec<Diagnostic>) {
    for token in tokens.iter().filter(|t| t.kind == TokenKind::String) {
        if is_match(&PERCENT_VAR, &token.text) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::OldVariableSyntax,
                "Legacy %var% reference in string; concatenate the variable instead",
                token.span(),
            ));
        }
    }
}

/// Only a loop's own `{` opens a loop level; other braces are tracked so their
/// `}` does not close one.
fn check_loop_depth(cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let tokens = cx.tokens;
    let mut open: Vec<bool> = Vec::new();
    let mut pending = false;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            kind if kind.is_loop() => {
                let depth = open.iter().filter(|is_loop| **is_loop).count() + 1;
                if depth > cx.config.max_loop_depth {
                    diagnostics.push(Diagnostic::info(
                        DiagnosticCode::DeeplyNestedLoop,
                        format!(
                            "Loop nested {} levels deep (max {}); consider extracting a function",
                            depth, cx.config.max_loop_depth
                        ),
                        token.span(),
                    ));
                }
                pending = true;
            }
            TokenKind::LBrace => {
                open.push(pending);
                pending = false;
            }
            TokenKind::RBrace => {
                open.pop();
            }
            TokenKind::Newline if pending => {
                let next = tokens[i + 1..].iter().find(|t| t.kind != TokenKind::Newline);
                if !next.is_some_and(|t| t.kind == TokenKind::LBrace) {
                    pending = false;
                }
            }
            _ => {}
        }
    }
}

fn check_dangerous_calls(tokens: &[Token], diagnostics: &mut Vec<Diagnostic>) {
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Identifier && !after_dot(tokens, i) && builtins::is_dangerous_function(&token.text) {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::PotentialSecurityRisk,
                format!("Be careful with {} - ensure input is validated", token.text),
                token.span(),
            ));
        }
    }
}
