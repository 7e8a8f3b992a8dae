//! Printing a parsed query back out, as CQL or as a JSON tree.
//!
//! The CQL form is canonical: every clause is written as
//! `index relation term`, every triple is parenthesized, and a subquery that
//! carries prefix declarations or sort keys is wrapped so they keep their
//! scope. Parsing the output yields the same tree.
//!
//! # Examples
//!
//! ```
//! use sru_cql::parse;
//!
//! let query = parse("cat or dc.title any/cql.stem fish").unwrap();
//! assert_eq!(
//!     query.to_cql(),
//!     "(cql.serverchoice = cat or dc.title any/cql.stem fish)"
//! );
//! ```

use serde_json::{Value, json};

use crate::ast::{CqlQuery, Index, ModifierClause, NodeId, NodeKind, PrefixMap};

impl CqlQuery {
    pub fn to_cql(&self) -> String {
        self.node_to_cql(self.root())
    }

    fn node_to_cql(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut parts: Vec<String> = node
            .prefixes
            .iter()
            .map(|(name, identifier)| {
                if name.is_empty() {
                    format!(">\"{identifier}\"")
                } else {
                    format!(">{name}=\"{identifier}\"")
                }
            })
            .collect();

        parts.push(match &node.kind {
            NodeKind::Clause(clause) => {
                format!("{} {} {}", clause.index, clause.relation, clause.term)
            }
            NodeKind::Triple {
                left,
                boolean,
                right,
            } => format!(
                "({} {} {})",
                self.node_to_cql(*left),
                boolean,
                self.node_to_cql(*right)
            ),
        });

        if !node.sort_keys.is_empty() {
            parts.push("sortBy".to_string());
            parts.extend(node.sort_keys.iter().map(ToString::to_string));
        }

        let text = parts.join(" ");
        let scoped = !node.prefixes.is_empty() || !node.sort_keys.is_empty();
        if scoped && node.parent().is_some() {
            format!("({text})")
        } else {
            text
        }
    }

    /// Nested JSON view of the tree.
    pub fn to_json(&self) -> Value {
        self.node_to_json(self.root())
    }

    fn node_to_json(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let mut value = match &node.kind {
            NodeKind::Clause(clause) => json!({
                "type": "searchClause",
                "index": index_json(&clause.index),
                "relation": {
                    "prefix": clause.relation.prefix,
                    "value": clause.relation.value(),
                    "modifiers": modifiers_json(&clause.relation.modifiers),
                },
                "term": clause.term.value,
            }),
            NodeKind::Triple {
                left,
                boolean,
                right,
            } => json!({
                "type": "triple",
                "boolean": {
                    "value": boolean.op.as_str(),
                    "modifiers": modifiers_json(&boolean.modifiers),
                },
                "left": self.node_to_json(*left),
                "right": self.node_to_json(*right),
            }),
        };

        if let Value::Object(object) = &mut value {
            if !node.prefixes.is_empty() {
                object.insert("prefixes".to_string(), prefixes_json(&node.prefixes));
            }
            if !node.sort_keys.is_empty() {
                let keys = node.sort_keys.iter().map(index_json).collect();
                object.insert("sortKeys".to_string(), Value::Array(keys));
            }
        }
        value
    }
}

fn index_json(index: &Index) -> Value {
    let mut value = json!({
        "prefix": index.prefix,
        "name": index.name,
    });
    if !index.modifiers.is_empty() {
        value["modifiers"] = modifiers_json(&index.modifiers);
    }
    value
}

fn modifiers_json(modifiers: &[ModifierClause]) -> Value {
    modifiers
        .iter()
        .map(|modifier| {
            json!({
                "type": modifier.name.qualified_name(),
                "comparison": modifier.comparison.map(|c| c.as_str()).unwrap_or_default(),
                "value": modifier.value,
            })
        })
        .collect()
}

fn prefixes_json(prefixes: &PrefixMap) -> Value {
    prefixes
        .iter()
        .map(|(name, identifier)| (name.to_string(), Value::String(identifier.to_string())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}
