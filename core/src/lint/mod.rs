//! Multi-pass linter over the raw token stream and the parsed tree.
//!
//! Each pass is independent and sees the same [`LintContext`]. Diagnostics from
//! one pass are ordered by source offset; passes run in the order listed in
//! [`all_passes`].
//!
//! # Adding a pass
//!
//! 1. Create `core/src/lint/<your_pass>.rs` with a unit struct implementing [`LintPass`].
//! 2. Declare the module below and push it into `all_passes()`.

mod brackets;
pub mod builtins;
mod sequences;
mod style;
mod tree;

#[cfg(test)]
mod style_test;

use serde::{Deserialize, Serialize};

use crate::{
    ast::Program,
    diagnostic::{Diagnostic, DiagnosticCode},
    stmt::StmtParser,
    token::{Span, Token, Tokenizer},
};

/// Tunables for the style heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintConfig {
    /// Loop nesting above this depth is reported.
    pub max_loop_depth: usize,
    /// Spaces expected per brace level; a tab counts as this many spaces.
    pub indent_width: usize,
    /// Single-letter names that are never reported.
    pub allowed_short_names: Vec<String>,
    pub require_version_directive: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            max_loop_depth: 3,
            indent_width: 4,
            allowed_short_names: ["i", "j", "k", "x", "y", "z"].iter().map(|s| s.to_string()).collect(),
            require_version_directive: true,
        }
    }
}

/// Everything a pass may look at. `program` is `None` when lexing failed.
pub(crate) struct LintContext<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    pub program: Option<&'a Program>,
    pub config: &'a LintConfig,
}

pub(crate) trait LintPass {
    fn name(&self) -> &'static str;
    fn check(&self, cx: &LintContext<'_>, diagnostics: &mut Vec<Diagnostic>);
}

fn all_passes() -> Vec<Box<dyn LintPass>> {
    vec![
        Box::new(brackets::BracketPass),
        Box::new(sequences::SequencePass),
        Box::new(tree::TreePass),
        Box::new(style::StylePass),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Lint `source`. Never fails: an unterminated string becomes a single
    /// `ParseError` diagnostic appended after the token-based findings.
    pub fn lint(&self, source: &str) -> Vec<Diagnostic> {
        let (tokens, lex_error) = Tokenizer::tokenize_lossy(source);
        let program = match lex_error {
            None => Some(StmtParser::new(&tokens, source).parse_program().0),
            Some(_) => None,
        };
        let cx = LintContext {
            source,
            tokens: &tokens,
            program: program.as_ref(),
            config: &self.config,
        };

        let mut diagnostics = Vec::new();
        for pass in all_passes() {
            let mut found = Vec::new();
            pass.check(&cx, &mut found);
            found.sort_by_key(|d| d.range.start.offset);
            tracing::trace!(pass = pass.name(), count = found.len(), "lint pass finished");
            diagnostics.extend(found);
        }

        if let Some(err) = lex_error {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::ParseError,
                err.message,
                Span::single(err.position),
            ));
        }

        tracing::debug!(count = diagnostics.len(), "linted source");
        diagnostics
    }
}

/// Lint with the default configuration.
pub fn lint(source: &str) -> Vec<Diagnostic> {
    Linter::new().lint(source)
}
