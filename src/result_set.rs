//! Detection of queries that only name a stored result set.
//!
//! `cql.resultSetId = "abc"`, or any `and`/`or` combination of clauses that
//! all name the same set, can be answered from the cached result set without
//! asking the backend.

use crate::ast::{BooleanOp, CqlQuery, NodeId, NodeKind, SearchClause, prefixes::CQL_CONTEXT_SET};

const RESULT_SET_INDEX: &str = "resultsetid";

impl CqlQuery {
    /// The result set id the whole query reduces to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sru_cql::parse;
    ///
    /// let query = parse("cql.resultSetId = rs1 or cql.resultSetId = rs1").unwrap();
    /// assert_eq!(query.result_set_id().as_deref(), Some("rs1"));
    ///
    /// let query = parse("cql.resultSetId = rs1 not cql.resultSetId = rs1").unwrap();
    /// assert_eq!(query.result_set_id(), None);
    /// ```
    pub fn result_set_id(&self) -> Option<String> {
        self.result_set_id_at(self.root())
    }

    /// Same as [`result_set_id`](Self::result_set_id) for the subtree at `id`.
    pub fn result_set_id_at(&self, id: NodeId) -> Option<String> {
        let mut ids = Vec::new();
        if !self.collect_result_set_ids(id, &mut ids) {
            return None;
        }

        let first = ids.first()?;
        ids.iter().all(|other| other == first).then(|| first.to_string())
    }

    /// Pushes the id of every leaf; false as soon as a leaf is not a result
    /// set clause or a `not`/`prox` is met.
    fn collect_result_set_ids<'a>(&'a self, id: NodeId, ids: &mut Vec<&'a str>) -> bool {
        match &self.node(id).kind {
            NodeKind::Clause(clause) => match self.clause_result_set_id(id, clause) {
                Some(value) => {
                    ids.push(value);
                    true
                }
                None => false,
            },
            NodeKind::Triple {
                left,
                boolean,
                right,
            } => {
                if matches!(boolean.op, BooleanOp::Not | BooleanOp::Prox) {
                    return false;
                }
                self.collect_result_set_ids(*left, ids) && self.collect_result_set_ids(*right, ids)
            }
        }
    }

    fn clause_result_set_id<'a>(&'a self, id: NodeId, clause: &'a SearchClause) -> Option<&'a str> {
        let in_cql_set = self.resolve_prefix(id, &clause.index.prefix) == Some(CQL_CONTEXT_SET);
        (in_cql_set && clause.index.name.eq_ignore_ascii_case(RESULT_SET_INDEX))
            .then(|| clause.term.unquoted())
    }
}
