pub mod stmt_parser;

#[cfg(test)]
mod stmt_test;

pub use stmt_parser::*;

use crate::{
    ast::Program,
    token::{LexError, SkippedSpan, Tokenizer},
};
use serde::Serialize;

/// Result of a parse: the statements that parsed plus the ones recovery dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub program: Program,
    pub skipped: Vec<SkippedSpan>,
}

/// Tokenize and parse `source`. Only an unterminated string can fail; every other
/// grammar error drops the offending statement and is reported in `skipped`.
pub fn parse(source: &str) -> Result<ParseOutput, LexError> {
    let tokens = Tokenizer::tokenize(source)?;
    let (program, skipped) = StmtParser::new(&tokens, source).parse_program();
    Ok(ParseOutput { program, skipped })
}
