pub mod ast;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod result_set;

pub use ast::{CqlQuery, Index, NodeId, NodeKind, PrefixMap, SearchClause, Term, Token};
pub use codegen::FieldMapping;
pub use config::{ConfigError, ParserConfig, Settings};
pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use lexer::Lexer;
pub use parser::Parser;

/// Parses `query` with the lenient default configuration.
///
/// ```
/// let query = sru_cql::parse("dc.title any fish").unwrap();
/// assert_eq!(query.clauses().len(), 1);
/// ```
pub fn parse(query: &str) -> Result<CqlQuery, Diagnostic> {
    parse_with(query, &ParserConfig::default())
}

pub fn parse_with(query: &str, config: &ParserConfig) -> Result<CqlQuery, Diagnostic> {
    let lexer = Lexer::with_word_chars(query, &config.word_chars);
    let parsed = Parser::with_config(lexer, config.clone()).and_then(|mut parser| parser.parse());

    match &parsed {
        Ok(tree) => tracing::debug!(query, nodes = tree.len(), "parsed CQL query"),
        Err(diagnostic) => tracing::debug!(
            query,
            code = %diagnostic.code,
            details = %diagnostic.details,
            "CQL query rejected"
        ),
    }
    parsed
}
