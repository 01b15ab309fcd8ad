use crate::docs::{DocIndex, DocSource};
use crate::standards::{RuleEngine, StandardsEngine};
use ahk_core::{
    diagnostic::Diagnostic,
    lint::{LintConfig, Linter},
};
use std::sync::Arc;
use tower_lsp::lsp_types as lsp;

mod completions;
mod diagnostics;
mod semantic_tokens;
#[cfg(test)]
mod tests;

pub use completions::{detect_context, get_completions, CompletionContext};
pub use diagnostics::{
    to_lsp_diagnostic, to_lsp_range, DiagnosticOptions, DiagnosticProvider, PROVIDER_SOURCE, STANDARDS_SOURCE,
};
pub use semantic_tokens::{
    classify_semantic_tokens, encode_semantic_tokens, legend, SemanticToken, SemanticTokenModifier, SemanticTokenType,
};

/// Editor-facing analyses over one shared, read-only documentation index and
/// rule engine. Every call works on its own token buffers, so one analyzer can
/// serve concurrent requests.
#[derive(Clone)]
pub struct AhkAnalyzer {
    docs: Arc<dyn DocSource>,
    provider: DiagnosticProvider,
    linter: Linter,
}

impl Default for AhkAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(DocIndex::builtin().clone()), Arc::new(StandardsEngine::new()))
    }
}

impl AhkAnalyzer {
    pub fn new(docs: Arc<dyn DocSource>, rules: Arc<dyn RuleEngine>) -> Self {
        Self {
            docs,
            provider: DiagnosticProvider::new(rules),
            linter: Linter::new(),
        }
    }

    pub fn with_lint_config(mut self, config: LintConfig) -> Self {
        self.linter = Linter::with_config(config);
        self
    }

    pub fn semantic_tokens(&self, source: &str) -> Vec<SemanticToken> {
        classify_semantic_tokens(source)
    }

    /// Delta-encoded tokens ready for a `textDocument/semanticTokens/full` reply.
    pub fn semantic_tokens_full(&self, source: &str) -> lsp::SemanticTokens {
        lsp::SemanticTokens {
            result_id: None,
            data: encode_semantic_tokens(&self.semantic_tokens(source)),
        }
    }

    pub fn completions(&self, source: &str, position: lsp::Position) -> Vec<lsp::CompletionItem> {
        get_completions(source, position, self.docs.as_ref())
    }

    pub fn diagnose(&self, source: &str, options: &DiagnosticOptions) -> Vec<Diagnostic> {
        self.provider.diagnose(source, options)
    }

    pub fn lint(&self, source: &str) -> Vec<Diagnostic> {
        self.linter.lint(source)
    }

    /// Linter and provider findings together, converted for the editor.
    pub fn lsp_diagnostics(&self, source: &str, options: &DiagnosticOptions) -> Vec<lsp::Diagnostic> {
        let mut all = self.lint(source);
        all.extend(self.diagnose(source, options));
        all.iter().map(to_lsp_diagnostic).collect()
    }
}
