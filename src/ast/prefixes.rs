use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved prefix of the CQL context set.
pub const CQL_PREFIX: &str = "cql";
pub const DC_PREFIX: &str = "dc";
pub const SRW_PREFIX: &str = "srw";

pub const CQL_CONTEXT_SET: &str = "info:srw/cql-context-set/1/cql-v1.1";
pub const DC_CONTEXT_SET: &str = "info:srw/cql-context-set/1/dc-v1.1";
pub const SRW_CONTEXT_SET: &str = "http://www.loc.gov/zing/cql/srw-indexes/v1.0/";

/// Built-in prefixes, consulted after every declaration in the tree.
pub fn reserved_prefix(name: &str) -> Option<&'static str> {
    match name {
        CQL_PREFIX => Some(CQL_CONTEXT_SET),
        DC_PREFIX => Some(DC_CONTEXT_SET),
        SRW_PREFIX => Some(SRW_CONTEXT_SET),
        _ => None,
    }
}

/// Short name → context set identifier.
///
/// Names are case-insensitive and stored lower-cased. The empty name is the
/// default context set declared with a bare `>identifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn insert(&mut self, name: &str, identifier: impl Into<String>) {
        self.entries.insert(name.to_lowercase(), identifier.into());
    }

    /// Inserts only when `name` is not declared yet; returns whether it did.
    pub fn insert_if_absent(&mut self, name: &str, identifier: impl Into<String>) -> bool {
        let key = name.to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, identifier.into());
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for PrefixMap {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut map = PrefixMap::new();
        for (name, identifier) in raw {
            map.insert(&name, identifier);
        }
        map
    }
}

impl From<PrefixMap> for BTreeMap<String, String> {
    fn from(map: PrefixMap) -> Self {
        map.entries
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for PrefixMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut map = PrefixMap::new();
        for (name, identifier) in iter {
            map.insert(name, identifier);
        }
        map
    }
}
