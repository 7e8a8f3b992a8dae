use std::fmt;

use crate::ast::ModifierClause;
use crate::config::DEFAULT_WORD_CHARS;

/// A possibly prefixed field reference: `title`, `dc.title`, `cql.serverChoice`.
///
/// Dotted names are stored lower-cased on both halves; an undotted name keeps
/// its case and has an empty prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub prefix: String,
    pub name: String,
    /// Only sort keys carry modifiers (`sortBy title/sort.descending`).
    pub modifiers: Vec<ModifierClause>,
}

impl Index {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Index {
            prefix: prefix.into(),
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<ModifierClause>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }

    /// `prefix.name`, or just `name` when unprefixed.
    pub fn qualified_name(&self) -> String {
        if self.has_prefix() {
            format!("{}.{}", self.prefix, self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Whether `text` lexes back as a single bare word.
fn is_bare_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || DEFAULT_WORD_CHARS.contains(c))
}

/// Quoted when the name would not survive re-lexing as a bare word
/// (`"my index"`).
impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.qualified_name();
        if is_bare_word(&name) {
            f.write_str(&name)?;
        } else {
            write!(f, "\"{name}\"")?;
        }
        for modifier in &self.modifiers {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

/// Search term, kept as written: a quoted phrase keeps its quotes and
/// escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub value: String,
}

impl Term {
    pub fn new(value: impl Into<String>) -> Self {
        Term {
            value: value.into(),
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.value.len() >= 2 && self.value.starts_with('"') && self.value.ends_with('"')
    }

    /// The term without its surrounding quotes. Escapes are left alone.
    pub fn unquoted(&self) -> &str {
        if self.is_quoted() {
            &self.value[1..self.value.len() - 1]
        } else {
            &self.value
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
