//! One-call analysis: tokens, tree, lint findings and simple code metrics.

use serde::Serialize;
use std::fmt::Write;

use crate::{
    ast::{Alternate, IfStatement, Program, Stmt},
    diagnostic::Diagnostic,
    lint::Linter,
    stmt::StmtParser,
    token::{LexError, SkippedSpan, Token, TokenKind, Tokenizer},
};


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeStatistics {
    pub lines: usize,
    /// Excludes the trailing EOF token.
    pub tokens: usize,
    pub functions: usize,
    pub classes: usize,
    pub comments: usize,
    /// 1 + functions, classes and `if`s + 2 per loop, over the whole tree.
    pub complexity: usize,
}

impl CodeStatistics {
    pub fn collect(source: &str, tokens: &[Token], program: &Program) -> Self {
        let mut stats = CodeStatistics {
            lines: source.split('\n').count(),
            tokens: tokens.iter().filter(|t| t.kind != TokenKind::Eof).count(),
            comments: tokens.iter().filter(|t| t.kind == TokenKind::Comment).count(),
            complexity: 1,
            ..Default::default()
        };
        stats.visit(&program.body);
        stats
    }

    fn visit(&mut self, body: &[Stmt]) {
        for stmt in body {
            match stmt {
                Stmt::Function(_) => {
                    self.functions += 1;
                    self.complexity += 1;
                }
                Stmt::Class(_) => {
                    self.classes += 1;
                    self.complexity += 1;
                }
                Stmt::If(s) => self.complexity += if_chain_len(s),
                Stmt::While(_) | Stmt::For(_) | Stmt::Loop(_) => self.complexity += 2,
                _ => {}
            }
            for child in stmt.child_bodies() {
                self.visit(child);
            }
        }
    }
}

fn if_chain_len(stmt: &IfStatement) -> usize {
    let mut count = 1;
    let mut current = stmt;
    while let Some(Alternate::ElseIf(next)) = &current.alternate {
        count += 1;
        current = next;
    }
    count
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub skipped: Vec<SkippedSpan>,
    pub diagnostics: Vec<Diagnostic>,
    pub statistics: CodeStatistics,
}

impl AnalysisReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Full analysis with the default lint configuration.
pub fn analyze(source: &str) -> Result<AnalysisReport, LexError> {
    analyze_with(&Linter::new(), source)
}

pub fn analyze_with(linter: &Linter, source: &str) -> Result<AnalysisReport, LexError> {
    let tokens = Tokenizer::tokenize(source)?;
    let (program, skipped) = StmtParser::new(&tokens, source).parse_program();
    let diagnostics = linter.lint(source);
    let statistics = CodeStatistics::collect(source, &tokens, &program);
    tracing::debug!(
        tokens = statistics.tokens,
        skipped = skipped.len(),
        diagnostics = diagnostics.len(),
        "analyzed source"
    );
    Ok(AnalysisReport {
        tokens,
        program,
        skipped,
        diagnostics,
        statistics,
    })
}

/// True when the source lexes and the linter reports no errors.
pub fn validate(source: &str) -> bool {
    !Linter::new().lint(source).iter().any(Diagnostic::is_error)
}

/// `line:col severity [code] message`, one diagnostic per line.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let _ = writeln!(
            out,
            "{}:{} {} [{}] {}",
            d.range.start.line, d.range.start.column, d.severity, d.code, d.message
        );
    }
    out
}
