//! CLI support for sru-cql
//!
//! Provides programmatic access to the `cql` command so that an SRU endpoint
//! or a test harness can run the same checks without spawning a process.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocTopic, diagnostics_table, get_doc_topic, get_docs_overview};

use std::io;

use thiserror::Error;

use crate::{ConfigError, Diagnostic};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// The query was rejected
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    /// Settings file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoQuery,
    #[error("Unknown topic: '{0}'\nRun 'cql docs' to see available topics.")]
    UnknownTopic(String),
}
