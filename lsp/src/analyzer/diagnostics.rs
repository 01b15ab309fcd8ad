use crate::standards::{is_legacy_assignment, RuleEngine, StandardsEngine, Violation};
use ahk_core::{
    diagnostic::{Diagnostic, DiagnosticCode, Severity},
    token::{LineIndex, Position, Span, TokenKind},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_lsp::lsp_types as lsp;

/// Source tag for the provider's own findings.
pub const PROVIDER_SOURCE: &str = "ahk-diagnostics";
/// Source tag for findings relayed from the rule engine.
pub const STANDARDS_SOURCE: &str = "ahk-standards";

static FUNCTION_HEADER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\s*(\w+)\s*\([^)]*\)\s*\{?\s*$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticOptions {
    pub enable_standards: bool,
    /// Keep only this level (`error`, `warning`, `info`, `information`, `hint`).
    /// `all` or an unknown name keeps everything.
    pub severity_filter: Option<String>,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            enable_standards: true,
            severity_filter: None,
        }
    }
}

/// Line- and character-level checker that works without a parse tree.
#[derive(Clone)]
pub struct DiagnosticProvider {
    rules: Arc<dyn RuleEngine>,
}

impl Default for DiagnosticProvider {
    fn default() -> Self {
        Self::new(Arc::new(StandardsEngine::new()))
    }
}

impl std::fmt::Debug for DiagnosticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticProvider").finish_non_exhaustive()
    }
}

impl DiagnosticProvider {
    pub fn new(rules: Arc<dyn RuleEngine>) -> Self {
        Self { rules }
    }

    pub fn diagnose(&self, source: &str, options: &DiagnosticOptions) -> Vec<Diagnostic> {
        let index = LineIndex::new(source);
        let mut out = check_brackets(source, &index);
        check_lines(source, &index, &mut out);
        if options.enable_standards {
            out.extend(self.rules.validate(source).iter().map(|v| from_violation(v, &index)));
        }
        check_semantics(source, &mut out);

        let total = out.len();
        if let Some(level) = options.severity_filter.as_deref().and_then(Severity::from_level) {
            out.retain(|d| d.severity == level);
        }
        tracing::debug!(total, kept = out.len(), "diagnosed");
        out
    }
}

fn char_span(index: &LineIndex<'_>, offset: usize, c: char) -> Span {
    Span::new(index.position(offset), index.position(offset + c.len_utf8()))
}

fn provider(code: DiagnosticCode, severity: Severity, message: impl Into<String>, range: Span) -> Diagnostic {
    Diagnostic::new(code, severity, message, range).with_source(PROVIDER_SOURCE)
}

/// Character scan for `{}` and `()`, ignoring string and comment text.
fn check_brackets(source: &str, index: &LineIndex<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut braces: Vec<usize> = Vec::new();
    let mut parens: Vec<usize> = Vec::new();
    let (mut in_string, mut in_comment) = (false, false);
    let mut prev: Option<char> = None;

    for (offset, c) in source.char_indices() {
        let before = prev.replace(c);
        if c == '\n' {
            in_string = false;
            in_comment = false;
            continue;
        }
        if in_comment {
            continue;
        }
        if c == '"' && before != Some('`') {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if c == ';' && before.is_none_or(char::is_whitespace) {
            in_comment = true;
            continue;
        }
        match c {
            '{' => braces.push(offset),
            '(' => parens.push(offset),
            '}' if braces.pop().is_none() => out.push(provider(
                DiagnosticCode::UnmatchedBrace,
                Severity::Error,
                "Unmatched closing brace",
                char_span(index, offset, c),
            )),
            ')' if parens.pop().is_none() => out.push(provider(
                DiagnosticCode::UnmatchedParen,
                Severity::Error,
                "Unmatched closing parenthesis",
                char_span(index, offset, c),
            )),
            _ => {}
        }
    }

    for offset in braces {
        out.push(provider(
            DiagnosticCode::UnclosedBrace,
            Severity::Error,
            "Unclosed brace",
            char_span(index, offset, '{'),
        ));
    }
    for offset in parens {
        out.push(provider(
            DiagnosticCode::UnclosedParen,
            Severity::Error,
            "Unclosed parenthesis",
            char_span(index, offset, '('),
        ));
    }
    out.sort_by_key(|d| d.range.start.offset);
    out
}

fn check_lines(source: &str, index: &LineIndex<'_>, out: &mut Vec<Diagnostic>) {
    let lines: Vec<&str> = source.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();

    if !source.trim().is_empty() && !lines.iter().take(5).any(|l| l.contains("#Requires")) {
        out.push(provider(
            DiagnosticCode::MissingDirective,
            Severity::Info,
            "Missing '#Requires AutoHotkey v2.0' directive",
            Span::single(Position::start()),
        ));
    }

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        let line_no = idx as u32 + 1;
        let start = index.line_start(line_no);
        let span_of = |from: usize, len: usize| Span::new(index.position(start + from), index.position(start + from + len));

        if is_legacy_assignment(line) {
            if let Some(at) = line.find('=') {
                out.push(provider(
                    DiagnosticCode::LegacyAssignment,
                    Severity::Warning,
                    "Use ':=' for assignment; '=' compares in AutoHotkey v2",
                    span_of(at, 1),
                ));
            }
        }

        if let Some(name) = declared_function(line, lines.get(idx + 1).copied()) {
            if name.starts_with(|c: char| c.is_ascii_lowercase()) && TokenKind::keyword(&name.to_lowercase()).is_none() {
                let at = line.find(name).unwrap_or(0);
                out.push(provider(
                    DiagnosticCode::FunctionNaming,
                    Severity::Hint,
                    format!("Function '{}' should start with an uppercase letter", name),
                    span_of(at, name.len()),
                ));
            }
        }

        if let Some(trigger) = trimmed.strip_suffix("::") {
            let next_blank = lines.get(idx + 1).is_none_or(|next| next.trim().is_empty());
            if next_blank && !trigger.trim().is_empty() {
                let at = line.find(trigger).unwrap_or(0);
                out.push(provider(
                    DiagnosticCode::EmptyHotkey,
                    Severity::Warning,
                    format!("Hotkey '{}' has no action", trigger.trim()),
                    span_of(at, trimmed.len()),
                ));
            }
        }
    }
}

/// Name of a function declared on `line`: a `name(...)` header whose `{` sits
/// at the end of the line or opens the next one.
fn declared_function<'a>(line: &'a str, next: Option<&str>) -> Option<&'a str> {
    let caps = FUNCTION_HEADER.as_ref()?.captures(line)?;
    let opens_here = line.trim_end().ends_with('{');
    let opens_next = next.is_some_and(|n| n.trim_start().starts_with('{'));
    if !(opens_here || opens_next) {
        return None;
    }
    caps.get(1).map(|m| m.as_str())
}

fn from_violation(v: &Violation, index: &LineIndex<'_>) -> Diagnostic {
    let start = index.position_at(v.line, v.column + 1);
    let end = index.position_at(v.line, v.column + 2);
    Diagnostic::new(DiagnosticCode::StandardsViolation, v.severity, v.message.clone(), Span::new(start, end))
        .with_source(STANDARDS_SOURCE)
        .with_rule_id(format!("standards.{}", v.rule))
}

/// Tree-based checks are disabled here: the simplified grammar misreads shapes
/// like `if (cond)` followed by a brace as function declarations. The linter
/// owns AST-backed findings.
fn check_semantics(_source: &str, _out: &mut Vec<Diagnostic>) {}

/// 1-based core span to a 0-based LSP range.
pub fn to_lsp_range(span: &Span) -> lsp::Range {
    let pos = |p: &Position| lsp::Position::new(p.line.saturating_sub(1), p.column.saturating_sub(1));
    lsp::Range::new(pos(&span.start), pos(&span.end))
}

pub fn to_lsp_diagnostic(d: &Diagnostic) -> lsp::Diagnostic {
    let severity = match d.severity {
        Severity::Error => lsp::DiagnosticSeverity::ERROR,
        Severity::Warning => lsp::DiagnosticSeverity::WARNING,
        Severity::Info => lsp::DiagnosticSeverity::INFORMATION,
        Severity::Hint => lsp::DiagnosticSeverity::HINT,
    };
    let code = d.rule_id.clone().unwrap_or_else(|| d.code.as_str().to_string());
    lsp::Diagnostic {
        range: to_lsp_range(&d.range),
        severity: Some(severity),
        code: Some(lsp::NumberOrString::String(code)),
        source: Some(d.source.clone()),
        message: d.message.clone(),
        ..Default::default()
    }
}
