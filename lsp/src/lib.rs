//! Editor analyses for AutoHotkey v2 built on `ahk_core`: semantic tokens,
//! completions, line diagnostics and coding-standards checks, with conversions
//! into `tower_lsp` protocol types.

pub mod analyzer;
pub mod docs;
pub mod standards;

pub use analyzer::{
    classify_semantic_tokens, encode_semantic_tokens, get_completions, legend, AhkAnalyzer, CompletionContext,
    DiagnosticOptions, DiagnosticProvider, SemanticToken, SemanticTokenModifier, SemanticTokenType,
};
pub use docs::{DocIndex, DocSource};
pub use standards::{RuleEngine, StandardsEngine, Violation};
pub use tower_lsp::lsp_types;
