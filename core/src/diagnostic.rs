use crate::token::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source tag on diagnostics produced by the linter.
pub const LINT_SOURCE: &str = "ahk-lint";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        }
    }

    /// Level name used by severity filters. `all` and unknown names select nothing.
    pub fn from_level(level: &str) -> Option<Severity> {
        match level.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" | "information" => Some(Severity::Info),
            "hint" => Some(Severity::Hint),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    ParseError,
    // Brackets
    UnmatchedBrace,
    UnmatchedParen,
    UnmatchedBracket,
    UnclosedBracket,
    UnclosedBrace,
    UnclosedParen,
    // Token sequences
    InvalidOperatorSequence,
    UseAssignmentOperator,
    IncompleteIfStatement,
    // Tree checks
    UndefinedFunction,
    UnreachableCode,
    DuplicateFunction,
    ReadOnlyAssignment,
    // Style
    HungarianNotation,
    ShortVariableName,
    InconsistentIndentation,
    OldVariableSyntax,
    MissingRequires,
    DeeplyNestedLoop,
    PotentialSecurityRisk,
    // Line heuristics
    LegacyAssignment,
    MissingDirective,
    FunctionNaming,
    EmptyHotkey,
    StandardsViolation,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "ParseError",
            DiagnosticCode::UnmatchedBrace => "UnmatchedBrace",
            DiagnosticCode::UnmatchedParen => "UnmatchedParen",
            DiagnosticCode::UnmatchedBracket => "UnmatchedBracket",
            DiagnosticCode::UnclosedBracket => "UnclosedBracket",
            DiagnosticCode::UnclosedBrace => "UnclosedBrace",
            DiagnosticCode::UnclosedParen => "UnclosedParen",
            DiagnosticCode::InvalidOperatorSequence => "InvalidOperatorSequence",
            DiagnosticCode::UseAssignmentOperator => "UseAssignmentOperator",
            DiagnosticCode::IncompleteIfStatement => "IncompleteIfStatement",
            DiagnosticCode::UndefinedFunction => "UndefinedFunction",
            DiagnosticCode::UnreachableCode => "UnreachableCode",
            DiagnosticCode::DuplicateFunction => "DuplicateFunction",
            DiagnosticCode::ReadOnlyAssignment => "ReadOnlyAssignment",
            DiagnosticCode::HungarianNotation => "HungarianNotation",
            DiagnosticCode::ShortVariableName => "ShortVariableName",
            DiagnosticCode::InconsistentIndentation => "InconsistentIndentation",
            DiagnosticCode::OldVariableSyntax => "OldVariableSyntax",
            DiagnosticCode::MissingRequires => "MissingRequires",
            DiagnosticCode::DeeplyNestedLoop => "DeeplyNestedLoop",
            DiagnosticCode::PotentialSecurityRisk => "PotentialSecurityRisk",
            DiagnosticCode::LegacyAssignment => "LegacyAssignment",
            DiagnosticCode::MissingDirective => "MissingDirective",
            DiagnosticCode::FunctionNaming => "FunctionNaming",
            DiagnosticCode::EmptyHotkey => "EmptyHotkey",
            DiagnosticCode::StandardsViolation => "StandardsViolation",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding. `range` uses 1-based lines and columns; editor conversions happen at the LSP edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub range: Span,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>, range: Span) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            range,
            source: LINT_SOURCE.to_string(),
            rule_id: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>, range: Span) -> Self {
        Self::new(code, Severity::Error, message, range)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, range: Span) -> Self {
        Self::new(code, Severity::Warning, message, range)
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>, range: Span) -> Self {
        Self::new(code, Severity::Info, message, range)
    }

    pub fn hint(code: DiagnosticCode, message: impl Into<String>, range: Span) -> Self {
        Self::new(code, Severity::Hint, message, range)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
