use std::fmt;

use crate::ast::{Index, Token};
use crate::ast::prefixes::CQL_PREFIX;

/// The six comparison relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `<>`
    NotEq,
}

impl Comparator {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Eq => Some(Comparator::Eq),
            Token::Gt => Some(Comparator::Gt),
            Token::GtEq => Some(Comparator::GtEq),
            Token::Lt => Some(Comparator::Lt),
            Token::LtEq => Some(Comparator::LtEq),
            Token::NotEq => Some(Comparator::NotEq),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gt => ">",
            Comparator::GtEq => ">=",
            Comparator::Lt => "<",
            Comparator::LtEq => "<=",
            Comparator::NotEq => "<>",
        }
    }

    /// `>`, `>=`, `<`, `<=`
    pub fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Eq | Comparator::NotEq)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a relation means, decided once when it is parsed.
///
/// A symbolic comparison is never confused with the word relations `all` and
/// `any`: those only come from a bare word in the `cql` context set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    Comparison(Comparator),
    All,
    Any,
    /// Any other word relation (`exact`, `adj`, `within`, ...). Accepted by
    /// the parser, rejected by the compiler.
    Named(String),
}

/// Relation between an index and a term, e.g. `=`, `any/cql.stem`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Context set of the relation; `cql` unless spelled out.
    pub prefix: String,
    pub kind: RelationKind,
    pub modifiers: Vec<ModifierClause>,
}

impl Relation {
    pub fn new(kind: RelationKind, modifiers: Vec<ModifierClause>) -> Self {
        Relation {
            prefix: CQL_PREFIX.to_string(),
            kind,
            modifiers,
        }
    }

    /// Builds a relation from a lower-cased word such as `all`, `cql.any`
    /// or `foo.near`.
    pub fn from_word(word: &str, modifiers: Vec<ModifierClause>) -> Self {
        let (prefix, name) = match word.split_once('.') {
            Some((prefix, name)) => (prefix, name),
            None => (CQL_PREFIX, word),
        };

        let kind = match (prefix, name) {
            (CQL_PREFIX, "all") => RelationKind::All,
            (CQL_PREFIX, "any") => RelationKind::Any,
            (_, name) => RelationKind::Named(name.to_string()),
        };

        Relation {
            prefix: prefix.to_string(),
            kind,
            modifiers,
        }
    }

    /// The unqualified relation value: `=`, `all`, `exact`, ...
    pub fn value(&self) -> &str {
        match &self.kind {
            RelationKind::Comparison(c) => c.as_str(),
            RelationKind::All => "all",
            RelationKind::Any => "any",
            RelationKind::Named(name) => name,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RelationKind::Comparison(c) => write!(f, "{c}")?,
            _ if self.prefix == CQL_PREFIX => f.write_str(self.value())?,
            _ => write!(f, "{}.{}", self.prefix, self.value())?,
        }
        for modifier in &self.modifiers {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

/// Boolean operators joining two subqueries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Not,
    Prox,
}

impl BooleanOp {
    /// Case-insensitive keyword match.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "and" => Some(BooleanOp::And),
            "or" => Some(BooleanOp::Or),
            "not" => Some(BooleanOp::Not),
            "prox" => Some(BooleanOp::Prox),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BooleanOp::And => "and",
            BooleanOp::Or => "or",
            BooleanOp::Not => "not",
            BooleanOp::Prox => "prox",
        }
    }
}

/// A boolean operator together with its modifiers (`prox/unit=word`).
#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub op: BooleanOp,
    pub modifiers: Vec<ModifierClause>,
}

impl Boolean {
    pub fn new(op: BooleanOp, modifiers: Vec<ModifierClause>) -> Self {
        Boolean { op, modifiers }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op.as_str())?;
        for modifier in &self.modifiers {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

/// `/name[comparison value]` refinement of a relation, boolean or sort key.
///
/// # Examples
/// ```text
/// /cql.stem
/// /rel.algorithm=okapi
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierClause {
    pub name: Index,
    pub comparison: Option<Comparator>,
    /// Empty when no comparison was given.
    pub value: String,
}

impl ModifierClause {
    pub fn new(name: Index, comparison: Option<Comparator>, value: impl Into<String>) -> Self {
        ModifierClause {
            name,
            comparison,
            value: value.into(),
        }
    }
}

impl fmt::Display for ModifierClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name)?;
        if let Some(comparison) = self.comparison {
            write!(f, "{comparison}{}", self.value)?;
        }
        Ok(())
    }
}
