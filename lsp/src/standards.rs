//! Coding-standards rule engine: per-line checks for v1 habits that break or
//! misbehave under AutoHotkey v2.

use ahk_core::diagnostic::Severity;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    /// 1-based line.
    pub line: u32,
    /// 0-based character offset within the line.
    pub column: u32,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// External checker whose findings the diagnostics provider folds into its own.
pub trait RuleEngine: Send + Sync {
    fn validate(&self, source: &str) -> Vec<Violation>;
}

fn regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

static OBJECT_LITERAL: Lazy<Option<Regex>> = Lazy::new(|| regex(r#"\{\s*"?\w+"?\s*:[^=]"#));
static NEW_KEYWORD: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\bnew\s+\w+\s*\("));
static LEGACY_ASSIGNMENT: Lazy<Option<Regex>> = Lazy::new(|| regex(r"^\s*\w+\s*=\s*[^=]"));
static UNBOUND_CALLBACK: Lazy<Option<Regex>> = Lazy::new(|| regex(r#"OnEvent\s*\(\s*"[^"]+"\s*,\s*this\.(\w+)\s*\)"#));
static BLOCK_ARROW: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\(\*\)\s*=>\s*\{"));

/// A rule hit: byte offset in the line plus an optional fix-it text.
struct Hit {
    at: usize,
    suggestion: Option<String>,
}

impl Hit {
    fn at(at: usize, suggestion: impl Into<String>) -> Self {
        Self {
            at,
            suggestion: Some(suggestion.into()),
        }
    }
}

struct LineRule {
    name: &'static str,
    message: &'static str,
    severity: Severity,
    check: fn(&str) -> Option<Hit>,
}

/// Whether a line (comparison operators aside) uses `=` to assign.
pub fn is_legacy_assignment(line: &str) -> bool {
    LEGACY_ASSIGNMENT.as_ref().is_some_and(|re| re.is_match(line))
        && !["==", "!=", ">=", "<=", ":="].iter().any(|op| line.contains(op))
}

fn map_constructor(line: &str) -> Option<Hit> {
    if line.contains("Map(") {
        return None;
    }
    let m = OBJECT_LITERAL.as_ref()?.find(line)?;
    Some(Hit::at(m.start(), "Replace {key: value} with Map(\"key\", value)"))
}

fn new_keyword(line: &str) -> Option<Hit> {
    let m = NEW_KEYWORD.as_ref()?.find(line)?;
    Some(Hit::at(m.start(), "Remove the \"new\" keyword"))
}

fn assignment_operator(line: &str) -> Option<Hit> {
    if !is_legacy_assignment(line) {
        return None;
    }
    Some(Hit::at(line.find('=')?, "Replace \"=\" with \":=\""))
}

fn quote_escaping(line: &str) -> Option<Hit> {
    let at = line.find("\\\"").or_else(|| line.find("\\'"))?;
    Some(Hit::at(at, "Escape quotes with a backtick: `\""))
}

fn comment_style(line: &str) -> Option<Hit> {
    if !line.trim_start().starts_with("//") {
        return None;
    }
    Some(Hit::at(line.find("//")?, "Replace \"//\" with \";\""))
}

fn method_binding(line: &str) -> Option<Hit> {
    if line.contains(".Bind(") {
        return None;
    }
    let caps = UNBOUND_CALLBACK.as_ref()?.captures(line)?;
    let method = caps.get(1)?.as_str();
    Some(Hit::at(line.find("this.")?, format!("Add .Bind(this) after {}", method)))
}

fn arrow_complexity(line: &str) -> Option<Hit> {
    BLOCK_ARROW.as_ref()?.find(line)?;
    Some(Hit::at(line.find("=>")?, "Use a regular function for multi-statement callbacks"))
}

const RULES: &[LineRule] = &[
    LineRule {
        name: "use_map_constructor",
        message: "Use Map() constructor instead of object literals for AutoHotkey v2",
        severity: Severity::Warning,
        check: map_constructor,
    },
    LineRule {
        name: "no_new_keyword",
        message: "Remove \"new\" keyword when initializing classes in AutoHotkey v2",
        severity: Severity::Error,
        check: new_keyword,
    },
    LineRule {
        name: "use_assignment_operator",
        message: "Use \":=\" for assignment, \"=\" for comparison in AutoHotkey v2",
        severity: Severity::Error,
        check: assignment_operator,
    },
    LineRule {
        name: "escape_quotes_with_backticks",
        message: "Use backticks to escape quotes in AutoHotkey v2 strings",
        severity: Severity::Warning,
        check: quote_escaping,
    },
    LineRule {
        name: "use_semicolon_comments",
        message: "Use semicolon (;) for comments, not double slash (//) in AutoHotkey v2",
        severity: Severity::Warning,
        check: comment_style,
    },
    LineRule {
        name: "bind_methods_for_callbacks",
        message: "Use .Bind(this) when passing methods as callbacks in AutoHotkey v2",
        severity: Severity::Error,
        check: method_binding,
    },
    LineRule {
        name: "arrow_functions_simple_only",
        message: "Use arrow functions only for simple expressions in AutoHotkey v2",
        severity: Severity::Warning,
        check: arrow_complexity,
    },
];

/// The default [`RuleEngine`]: seven line rules, each reported at most once per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardsEngine;

impl StandardsEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn rule_names() -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.name)
    }
}

impl RuleEngine for StandardsEngine {
    fn validate(&self, source: &str) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (idx, raw) in source.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim_start().starts_with(';') {
                continue;
            }
            for rule in RULES {
                let Some(hit) = (rule.check)(line) else {
                    continue;
                };
                violations.push(Violation {
                    rule: rule.name.to_string(),
                    message: rule.message.to_string(),
                    line: idx as u32 + 1,
                    column: line[..hit.at].chars().count() as u32,
                    severity: rule.severity,
                    suggestion: hit.suggestion,
                });
            }
        }
        tracing::trace!(count = violations.len(), "standards validated");
        violations
    }
}
