//! Parse and compile a CQL query the way the SRU endpoint does

use serde_json::json;

use super::CliError;
use crate::{CqlQuery, Settings, parse_with};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The CQL query
    pub query: String,
    /// Parser switches and field mappings
    pub settings: Settings,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid(CqlQuery),
    /// The query compiled to a backend query
    Compiled {
        query: CqlQuery,
        es: String,
        /// Set when the query only names a stored result set
        result_set_id: Option<String>,
    },
}

impl CheckResult {
    pub fn query(&self) -> &CqlQuery {
        match self {
            CheckResult::SyntaxValid(query) | CheckResult::Compiled { query, .. } => query,
        }
    }

    /// Machine readable summary.
    pub fn to_json(&self) -> serde_json::Value {
        let query = self.query();
        let mut value = json!({
            "query": query.source(),
            "cql": query.to_cql(),
            "ast": query.to_json(),
        });
        if let CheckResult::Compiled {
            es, result_set_id, ..
        } = self
        {
            value["es"] = json!(es);
            value["resultSetId"] = json!(result_set_id);
        }
        value
    }
}

/// Execute a cql check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let settings = &options.settings;
    let query = parse_with(&options.query, &settings.parser)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(query));
    }

    let es = query.to_es(&settings.dc_mapping, &settings.backend_mapping)?;
    let result_set_id = query.result_set_id();

    Ok(CheckResult::Compiled {
        query,
        es,
        result_set_id,
    })
}
