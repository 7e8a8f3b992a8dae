//! Compiles a parsed query into a search engine query string.
//!
//! The target is the Lucene-style free-text syntax understood by the
//! backend: `field:value` pairs, parenthesized `AND`/`OR` groups and `NOT(...)`.
//!
//! | CQL | Compiled |
//! |-----|----------|
//! | `title = spam` | `title:spam` |
//! | `eggs` | `eggs` |
//! | `year > 1999` | `year:>1999` |
//! | `ind <> 6` | `ind:-"6"` |
//! | `title any "spam hamm"` | `(title:spam OR title:hamm)` |
//! | `a not b` | `NOT(a AND b)` |
//!
//! Sorting, `prox` and modifiers are rejected with diagnostics 80, 37 and 21.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{
        BooleanOp, Comparator, CqlQuery, NodeId, NodeKind, RelationKind, SearchClause, Term,
        prefixes::{CQL_CONTEXT_SET, DC_CONTEXT_SET},
    },
    diagnostic::{Diagnostic, DiagnosticCode},
    parser::SERVER_CHOICE_INDEX,
};

/// Field that stands for "no field": the engine's default search.
pub const SERVER_CHOICE_FIELD: &str = "cql.serverchoice";

/// A read-only field name lookup table.
///
/// Used twice by [`CqlQuery::to_es`]: once keyed by Dublin Core element name
/// (`title`, `creator`, ...) for indexes in the `dc` context set, and once
/// keyed by internal field name to get the backend's field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    fields: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.fields.insert(from.into(), to.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        FieldMapping {
            fields: iter
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl CqlQuery {
    /// Compiles the whole tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sru_cql::{parse, FieldMapping};
    ///
    /// let query = parse("year > 1999").unwrap();
    /// let es = query.to_es(&FieldMapping::new(), &FieldMapping::new()).unwrap();
    /// assert_eq!(es, "year:>1999");
    /// ```
    pub fn to_es(
        &self,
        dc_mapping: &FieldMapping,
        backend_mapping: &FieldMapping,
    ) -> Result<String, Diagnostic> {
        let compiler = Compiler {
            query: self,
            dc_mapping,
            backend_mapping,
        };

        let compiled = compiler.compile(self.root());
        match &compiled {
            Ok(es) => tracing::debug!(query = self.source(), compiled = %es, "compiled CQL query"),
            Err(diagnostic) => tracing::debug!(
                query = self.source(),
                code = %diagnostic.code,
                details = %diagnostic.details,
                "CQL query not compilable"
            ),
        }
        compiled
    }
}

struct Compiler<'a> {
    query: &'a CqlQuery,
    dc_mapping: &'a FieldMapping,
    backend_mapping: &'a FieldMapping,
}

impl Compiler<'_> {
    fn error(&self, code: DiagnosticCode, details: impl Into<String>) -> Diagnostic {
        Diagnostic::new(code, details, self.query.source())
    }

    fn compile(&self, id: NodeId) -> Result<String, Diagnostic> {
        let node = self.query.node(id);

        if !node.sort_keys.is_empty() {
            let keys: Vec<String> = node.sort_keys.iter().map(ToString::to_string).collect();
            return Err(self.error(DiagnosticCode::SortUnsupported, keys.join(" ")));
        }

        match &node.kind {
            NodeKind::Clause(clause) => self.compile_clause(id, clause),
            NodeKind::Triple {
                left,
                boolean,
                right,
            } => {
                let connective = match boolean.op {
                    BooleanOp::And | BooleanOp::Not => "AND",
                    BooleanOp::Or => "OR",
                    BooleanOp::Prox => {
                        return Err(self.error(DiagnosticCode::UnsupportedBoolean, boolean.op.as_str()));
                    }
                };
                if !boolean.modifiers.is_empty() {
                    return Err(self.error(DiagnosticCode::UnsupportedModifiers, boolean.to_string()));
                }

                let left = self.compile(*left)?;
                let right = self.compile(*right)?;
                let group = format!("({left} {connective} {right})");

                Ok(if boolean.op == BooleanOp::Not {
                    format!("NOT{group}")
                } else {
                    group
                })
            }
        }
    }

    fn compile_clause(&self, id: NodeId, clause: &SearchClause) -> Result<String, Diagnostic> {
        if !clause.index.modifiers.is_empty() {
            return Err(self.error(DiagnosticCode::UnsupportedModifiers, clause.index.to_string()));
        }
        if !clause.relation.modifiers.is_empty() {
            return Err(self.error(
                DiagnosticCode::UnsupportedModifiers,
                clause.relation.to_string(),
            ));
        }

        let qualifier = match self.field_name(id, clause) {
            Some(field) => format!("{field}:"),
            None => String::new(),
        };
        let term = &clause.term;

        match &clause.relation.kind {
            RelationKind::Comparison(Comparator::Eq) => Ok(format!("{qualifier}{term}")),
            RelationKind::Comparison(Comparator::NotEq) => {
                Ok(format!("{qualifier}-\"{}\"", term.unquoted()))
            }
            RelationKind::Comparison(ordering) => {
                Ok(format!("{qualifier}{ordering}{}", term.unquoted()))
            }
            RelationKind::All => Ok(words(&qualifier, term, "AND")),
            RelationKind::Any => Ok(words(&qualifier, term, "OR")),
            RelationKind::Named(_) => Err(self.error(
                DiagnosticCode::UnsupportedRelation,
                clause.relation.to_string(),
            )),
        }
    }

    /// Backend field for the clause's index; `None` for server choice.
    fn field_name(&self, id: NodeId, clause: &SearchClause) -> Option<String> {
        let index = &clause.index;
        let context_set = self.query.resolve_prefix(id, &index.prefix);

        if context_set == Some(CQL_CONTEXT_SET) && index.name == SERVER_CHOICE_INDEX {
            return None;
        }

        let mut field = index.qualified_name();
        if context_set == Some(DC_CONTEXT_SET) {
            if let Some(internal) = self.dc_mapping.get(&index.name) {
                field = internal.to_string();
            }
        }
        if let Some(backend) = self.backend_mapping.get(&field) {
            field = backend.to_string();
        }

        if field.eq_ignore_ascii_case(SERVER_CHOICE_FIELD) {
            None
        } else {
            Some(field)
        }
    }
}

/// One `qualifier:word` per whitespace separated word, joined by
/// `connective`. The quotes of a phrase end up on the first and last word
/// and are dropped there.
fn words(qualifier: &str, term: &Term, connective: &str) -> String {
    let words: Vec<&str> = term.value.split_whitespace().collect();
    if words.len() < 2 {
        return format!("{qualifier}{term}");
    }

    let last = words.len() - 1;
    let fragments: Vec<String> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let mut word = *word;
            if i == 0 {
                word = word.strip_prefix('"').unwrap_or(word);
            }
            if i == last {
                word = word.strip_suffix('"').unwrap_or(word);
            }
            word
        })
        .filter(|word| !word.is_empty())
        .map(|word| format!("{qualifier}{word}"))
        .collect();

    match fragments.as_slice() {
        [] => format!("{qualifier}{term}"),
        [single] => single.clone(),
        _ => format!("({})", fragments.join(&format!(" {connective} "))),
    }
}
