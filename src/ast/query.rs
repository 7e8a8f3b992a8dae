use std::fmt;

use crate::ast::prefixes::reserved_prefix;
use crate::ast::{Boolean, NodeKind, PrefixMap, QueryNode, SearchClause};

/// Handle to a node inside a [`CqlQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node storage for one parse. Children are owned through their slot in the
/// arena; `parent` handles only ever point upwards for lookups.
#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    nodes: Vec<QueryNode>,
}

impl Arena {
    pub(crate) fn clause(&mut self, clause: SearchClause) -> NodeId {
        self.push(QueryNode::new(NodeKind::Clause(clause)))
    }

    pub(crate) fn triple(&mut self, left: NodeId, boolean: Boolean, right: NodeId) -> NodeId {
        let height = 1 + self.height(left).max(self.height(right));
        let mut node = QueryNode::new(NodeKind::Triple {
            left,
            boolean,
            right,
        });
        node.height = height;

        let id = self.push(node);
        self.nodes[left.0].parent = Some(id);
        self.nodes[right.0].parent = Some(id);
        id
    }

    pub(crate) fn height(&self, id: NodeId) -> usize {
        self.nodes[id.0].height
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut QueryNode {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, node: QueryNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

/// A parsed CQL query: the root of the tree plus everything needed to
/// resolve prefixes and report diagnostics against the original input.
///
/// Built fresh by every [`parse`](crate::parse) call and self-contained.
#[derive(Debug, Clone)]
pub struct CqlQuery {
    source: String,
    arena: Arena,
    root: NodeId,
    default_prefixes: PrefixMap,
}

impl CqlQuery {
    pub(crate) fn new(
        source: String,
        arena: Arena,
        root: NodeId,
        default_prefixes: PrefixMap,
    ) -> Self {
        CqlQuery {
            source,
            arena,
            root,
            default_prefixes,
        }
    }

    /// The query string this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &QueryNode {
        &self.arena.nodes[id.0]
    }

    pub fn root_node(&self) -> &QueryNode {
        self.node(self.root)
    }

    /// Number of clauses and triples in the tree.
    pub fn len(&self) -> usize {
        self.arena.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.nodes.is_empty()
    }

    /// All search clauses, left to right.
    pub fn clauses(&self) -> Vec<&SearchClause> {
        let mut out = Vec::new();
        self.collect_clauses(self.root, &mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, id: NodeId, out: &mut Vec<&'a SearchClause>) {
        match &self.node(id).kind {
            NodeKind::Clause(clause) => out.push(clause),
            NodeKind::Triple { left, right, .. } => {
                self.collect_clauses(*left, out);
                self.collect_clauses(*right, out);
            }
        }
    }

    /// Resolves `name` as seen from node `id`.
    ///
    /// Looks at the node's own declarations, then each ancestor's, then the
    /// reserved `cql`/`dc`/`srw` prefixes, then the caller's default map.
    pub fn resolve_prefix(&self, id: NodeId, name: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(identifier) = node.prefixes.get(name) {
                return Some(identifier);
            }
            current = node.parent;
        }

        reserved_prefix(&name.to_lowercase()).or_else(|| self.default_prefixes.get(name))
    }

    /// Context set identifier of the index of clause `id`, if it resolves.
    pub fn index_context_set(&self, id: NodeId) -> Option<&str> {
        let clause = self.node(id).as_clause()?;
        self.resolve_prefix(id, &clause.index.prefix)
    }
}
