//! Documentation content for the cql CLI

use std::fmt::Write;

use super::CliError;
use crate::DiagnosticCode;

/// Available documentation topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Syntax,
    Relations,
    Prefixes,
    Compilation,
    Diagnostics,
}

impl DocTopic {
    /// Parse topic name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "relations" | "relation" | "modifiers" => Some(Self::Relations),
            "prefixes" | "prefix" | "context-sets" => Some(Self::Prefixes),
            "compilation" | "es" | "backend" => Some(Self::Compilation),
            "diagnostics" | "errors" => Some(Self::Diagnostics),
            _ => None,
        }
    }
}

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"CQL DOCUMENTATION

CQL (Contextual Query Language) is the query language of the SRU search
protocol. A query is a set of search clauses joined by booleans.

DOCUMENTATION TOPICS

  syntax            Clauses, booleans, parentheses, sorting
  relations         Comparison and word relations, modifiers
  prefixes          Context sets and prefix declarations
  compilation       How queries are translated for the search backend
  diagnostics       Numbered errors raised for bad or unsupported queries

QUICK REFERENCE

  cat                           Bare term, searched in the default fields
  dc.title = "fish frog"        Index, relation, term
  title any "fish frog"         Any of the words
  year >= 1999                  Range
  a and (b or c) not d          Booleans, left to right
  >dc="info:srw/..." dc.title=x Prefix declaration
"#
}

/// Get documentation for a specific topic
pub fn get_doc_topic(name: &str) -> Result<String, CliError> {
    match DocTopic::from_str(name) {
        Some(DocTopic::Syntax) => Ok(SYNTAX_DOC.to_string()),
        Some(DocTopic::Relations) => Ok(RELATIONS_DOC.to_string()),
        Some(DocTopic::Prefixes) => Ok(PREFIXES_DOC.to_string()),
        Some(DocTopic::Compilation) => Ok(COMPILATION_DOC.to_string()),
        Some(DocTopic::Diagnostics) => Ok(diagnostics_table()),
        None => Err(CliError::UnknownTopic(name.to_string())),
    }
}

/// One line per diagnostic the parser or compiler can raise.
pub fn diagnostics_table() -> String {
    let mut table = String::from("DIAGNOSTICS\n\n");
    for code in DiagnosticCode::ALL {
        let _ = writeln!(table, "  {:<4}{:<28}{}", code.as_u16(), code.uri(), code.message());
    }
    table
}

const SYNTAX_DOC: &str = r#"SYNTAX - Clauses and Booleans

SEARCH CLAUSE
  index relation term
    dc.title = fish
    title any "fish frog"

  A bare term is searched in the server's default fields:
    fish          same as   cql.serverchoice = fish

BOOLEANS
  and, or, not, prox (case-insensitive), evaluated left to right.
  Parentheses group:
    (title = spam or subtitle = hamm) and eggs

QUOTES
  Terms with spaces or special characters are double-quoted.
  Inside quotes \" is a literal quote. Outside of quotes only
  \? \* \^ and \\ are valid escapes.

SORTING
  query sortBy index[/modifier] ...
  Sorting is parsed but rejected when the query is compiled.
"#;

const RELATIONS_DOC: &str = r#"RELATIONS

  =    Match                      title = fish
  <>   Does not match             title <> fish
  >    Greater than               year > 1999
  >=   Greater than or equal      year >= 1999
  <    Less than                  year < 2000
  <=   Less than or equal         year <= 2000
  all  Every word must match      title all "fish frog"
  any  Some word must match       title any "fish frog"

  Other relations (exact, adj, within, ...) parse but do not compile.

MODIFIERS
  /name or /name=value after a relation or boolean:
    title any/cql.stem/rel.algorithm=okapi fish
  Modifiers parse but do not compile.
"#;

const PREFIXES_DOC: &str = r#"PREFIXES

  >name="identifier" query
    Binds name to a context set for the query that follows.
  >"identifier" query
    Sets the context set for unprefixed indexes.

  Built in:
    cql   info:srw/cql-context-set/1/cql-v1.1
    dc    info:srw/cql-context-set/1/dc-v1.1
    srw   http://www.loc.gov/zing/cql/srw-indexes/v1.0/

  A declaration applies to its subquery only; inner declarations win.
"#;

const COMPILATION_DOC: &str = r#"COMPILATION

  title = spam               title:spam
  spam                       spam
  year > 1999                year:>1999
  ind <> 6                   ind:-"6"
  title all "spam hamm"      (title:spam AND title:hamm)
  title any "spam hamm"      (title:spam OR title:hamm)
  a and b                    (a AND b)
  a or b                     (a OR b)
  a not b                    NOT(a AND b)

  Indexes in the dc context set are looked up in the dc mapping, and the
  result in the backend mapping. Unknown indexes are used as written.

  cql.resultSetId = id  names a stored result set and is reported
  separately so it can be served from cache.
"#;
