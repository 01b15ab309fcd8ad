pub mod analysis;
pub mod ast;
pub mod diagnostic;
pub mod lint;
pub mod stmt;
pub mod token;

pub use analysis::{AnalysisReport, CodeStatistics, analyze, analyze_with, format_diagnostics, validate};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use lint::{LintConfig, Linter, lint};
pub use stmt::{ParseOutput, parse};
pub use token::{LexError, Token, TokenKind, tokenize};
