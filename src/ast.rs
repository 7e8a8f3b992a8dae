//! # CQL - Abstract Syntax Tree
//!
//! This module defines the tree a CQL query is parsed into.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[index]** - Index references and search terms
//! - **[operators]** - Relations, booleans and their modifiers
//! - **[clause]** - Search clauses and triples
//! - **[query]** - The parsed query and its node arena
//! - **[prefixes]** - Prefix maps and the reserved context sets
//!
//! ## Quick Start
//!
//! ```text
//! dc.title any "fish frog" and (dc.creator = sanderson or cat)
//! ```
//!
//! parses into a triple whose left operand is a search clause and whose
//! right operand is another triple; the bare word `cat` becomes the clause
//! `cql.serverchoice = cat`.
//!
//! ## Core Concepts
//!
//! ### Clauses and Triples
//!
//! A search clause is `index relation term`. Two subqueries joined by `and`,
//! `or`, `not` or `prox` form a triple. Booleans associate to the left and
//! parentheses are kept exactly as written.
//!
//! ### Prefixes
//!
//! `>dc="info:srw/cql-context-set/1/dc-v1.1"` binds a short name to a context
//! set for the subquery that follows. Lookups walk from a node up through its
//! parents, then fall back to the reserved `cql`, `dc` and `srw` sets.
//!
//! ### Modifiers
//!
//! Relations, booleans and sort keys take `/name[=value]` modifiers:
//!
//! ```text
//! dc.anywhere all/cql.stem/rel.algorithm=okapi "spam"
//! ```
pub mod tokens;
pub mod index;
pub mod operators;
pub mod clause;
pub mod query;
pub mod prefixes;

pub use tokens::Token;
pub use index::{Index, Term};
pub use operators::{Boolean, BooleanOp, Comparator, ModifierClause, Relation, RelationKind};
pub use clause::{NodeKind, QueryNode, SearchClause};
pub use query::{CqlQuery, NodeId};
pub use prefixes::PrefixMap;
