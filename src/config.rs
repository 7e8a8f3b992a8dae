//! Parser switches and the settings file consumed by the `cql` binary.
//!
//! Nothing here is global: every parse receives its [`ParserConfig`]
//! explicitly, and mapping tables travel with each compile call.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::PrefixMap;
use crate::codegen::FieldMapping;

/// Punctuation allowed inside bare words besides Unicode alphanumerics.
pub const DEFAULT_WORD_CHARS: &str = "!@#$%^&*-+{}[];,.?|~`:\\'_";

/// Default bound on subquery nesting and boolean chain length.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Strictness switches for the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject `""` and empty terms (diagnostic 27).
    pub error_on_empty_term: bool,

    /// Reject quoted index names and prefix identifiers (diagnostic 14).
    pub error_on_quoted_identifier: bool,

    /// Reject a prefix redeclared while already in scope, reserved names
    /// included (diagnostic 45).
    pub error_on_duplicate_prefix: bool,

    /// Extra characters the lexer accepts inside bare words.
    pub word_chars: String,

    /// Consulted last when resolving a prefix.
    pub default_prefixes: PrefixMap,

    /// Deepest subquery nesting, and longest chain of booleans, accepted
    /// before the query is rejected with diagnostic 10.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            error_on_empty_term: false,
            error_on_quoted_identifier: false,
            error_on_duplicate_prefix: false,
            word_chars: DEFAULT_WORD_CHARS.to_string(),
            default_prefixes: PrefixMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// All error switches on.
    pub fn strict() -> Self {
        ParserConfig {
            error_on_empty_term: true,
            error_on_quoted_identifier: true,
            error_on_duplicate_prefix: true,
            ..Self::default()
        }
    }
}

/// Everything needed to turn a query string into a backend query.
///
/// ```json
/// {
///   "parser": { "error_on_duplicate_prefix": true },
///   "dc_mapping": { "anywhere": "cql.serverchoice", "creator": "author" },
///   "backend_mapping": { "author": "author_display" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub parser: ParserConfig,
    /// Dublin Core element name → internal field.
    pub dc_mapping: FieldMapping,
    /// Internal field → backend field.
    pub backend_mapping: FieldMapping,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded CQL settings");
        Ok(settings)
    }
}
