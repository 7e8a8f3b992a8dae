use crate::ast::{Boolean, Index, NodeId, PrefixMap, Relation, Term};

/// The atomic query unit: `index relation term`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClause {
    pub index: Index,
    pub relation: Relation,
    pub term: Term,
}

impl SearchClause {
    pub fn new(index: Index, relation: Relation, term: Term) -> Self {
        SearchClause {
            index,
            relation,
            term,
        }
    }
}

/// Shape of a query node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Clause(SearchClause),

    /// Two subqueries joined by a boolean.
    Triple {
        left: NodeId,
        boolean: Boolean,
        right: NodeId,
    },
}

/// A search clause or triple together with what is scoped to it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub kind: NodeKind,
    /// Prefixes declared in front of this subquery.
    pub prefixes: PrefixMap,
    pub sort_keys: Vec<Index>,
    pub(crate) parent: Option<NodeId>,
    /// Levels of the subtree rooted here; 1 for a clause.
    pub(crate) height: usize,
}

impl QueryNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        QueryNode {
            kind,
            prefixes: PrefixMap::new(),
            sort_keys: Vec::new(),
            parent: None,
            height: 1,
        }
    }

    /// Syntactic parent, used for prefix lookup only.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn as_clause(&self) -> Option<&SearchClause> {
        match &self.kind {
            NodeKind::Clause(clause) => Some(clause),
            NodeKind::Triple { .. } => None,
        }
    }
}
