// tests/prefix_tests.rs

use sru_cql::ast::prefixes::{CQL_CONTEXT_SET, DC_CONTEXT_SET, SRW_CONTEXT_SET, reserved_prefix};
use sru_cql::{CqlQuery, NodeId, NodeKind, ParserConfig, PrefixMap, parse, parse_with};

fn children(query: &CqlQuery, id: NodeId) -> (NodeId, NodeId) {
    match &query.node(id).kind {
        NodeKind::Triple { left, right, .. } => (*left, *right),
        other => panic!("Expected triple, got {:?}", other),
    }
}

// ============================================================================
// Reserved Prefixes
// ============================================================================

#[test]
fn test_reserved_prefixes() {
    assert_eq!(reserved_prefix("cql"), Some(CQL_CONTEXT_SET));
    assert_eq!(reserved_prefix("dc"), Some(DC_CONTEXT_SET));
    assert_eq!(reserved_prefix("srw"), Some(SRW_CONTEXT_SET));
    assert_eq!(reserved_prefix("bib"), None);
}

#[test]
fn test_index_resolves_to_reserved_set() {
    let test_cases = vec![
        ("dc.title = x", Some(DC_CONTEXT_SET)),
        ("cql.serverChoice = x", Some(CQL_CONTEXT_SET)),
        ("srw.serverChoice = x", Some(SRW_CONTEXT_SET)),
        ("DC.title = x", Some(DC_CONTEXT_SET)),
        ("foo.bar = x", None),
        ("title = x", None),
    ];

    for (input, expected) in test_cases {
        let query = parse(input).unwrap();
        assert_eq!(query.index_context_set(query.root()), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_bare_term_resolves_to_cql_set() {
    let query = parse("fish").unwrap();
    assert_eq!(query.index_context_set(query.root()), Some(CQL_CONTEXT_SET));
}

#[test]
fn test_lookup_is_case_insensitive() {
    let query = parse("title = x").unwrap();
    assert_eq!(query.resolve_prefix(query.root(), "DC"), Some(DC_CONTEXT_SET));
}

// ============================================================================
// Declared Prefixes
// ============================================================================

#[test]
fn test_declaration_overrides_reserved() {
    let query = parse(r#">dc="http://example.org/dc" dc.title = x"#).unwrap();
    assert_eq!(query.index_context_set(query.root()), Some("http://example.org/dc"));
}

#[test]
fn test_declaration_reaches_descendants() {
    let query = parse(r#">x="u1" x.a = 1 and x.b = 2"#).unwrap();
    let (left, right) = children(&query, query.root());

    assert_eq!(query.index_context_set(left), Some("u1"));
    assert_eq!(query.index_context_set(right), Some("u1"));
}

#[test]
fn test_declaration_is_scoped_to_its_subquery() {
    let query = parse(r#"(>x="u1" x.a = 1) and x.b = 2"#).unwrap();
    let (left, right) = children(&query, query.root());

    assert_eq!(query.index_context_set(left), Some("u1"));
    assert_eq!(query.index_context_set(right), None);
    assert!(query.root_node().prefixes.is_empty());
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let query = parse(r#">x="outer" (x.a = 1 and >x="inner" x.b = 2)"#).unwrap();
    let (left, right) = children(&query, query.root());

    assert_eq!(query.index_context_set(left), Some("outer"));
    assert_eq!(query.index_context_set(right), Some("inner"));
}

#[test]
fn test_default_context_set_declaration() {
    let query = parse(r#">"http://example.org/set" title = x"#).unwrap();
    assert_eq!(query.index_context_set(query.root()), Some("http://example.org/set"));
}

#[test]
fn test_resolution_is_repeatable() {
    let query = parse(r#">x="u1" x.a = 1 and dc.b = 2"#).unwrap();
    let (left, right) = children(&query, query.root());

    for _ in 0..3 {
        assert_eq!(query.resolve_prefix(left, "x"), Some("u1"));
        assert_eq!(query.resolve_prefix(right, "dc"), Some(DC_CONTEXT_SET));
    }
}

// ============================================================================
// Configured Defaults
// ============================================================================

#[test]
fn test_configured_default_prefixes() {
    let config = ParserConfig {
        default_prefixes: [("local", "urn:local")].into_iter().collect(),
        ..ParserConfig::default()
    };

    let query = parse_with("local.idx = x", &config).unwrap();
    assert_eq!(query.index_context_set(query.root()), Some("urn:local"));
}

#[test]
fn test_reserved_prefixes_beat_configured_defaults() {
    let config = ParserConfig {
        default_prefixes: [("dc", "urn:other")].into_iter().collect(),
        ..ParserConfig::default()
    };

    let query = parse_with("dc.title = x", &config).unwrap();
    assert_eq!(query.index_context_set(query.root()), Some(DC_CONTEXT_SET));
}

#[test]
fn test_declarations_beat_configured_defaults() {
    let config = ParserConfig {
        default_prefixes: [("local", "urn:local")].into_iter().collect(),
        ..ParserConfig::default()
    };

    let query = parse_with(r#">local="urn:declared" local.idx = x"#, &config).unwrap();
    assert_eq!(query.index_context_set(query.root()), Some("urn:declared"));
}

// ============================================================================
// Prefix Map
// ============================================================================

#[test]
fn test_prefix_map_insert() {
    let mut map = PrefixMap::new();
    map.insert("Dc", "a");
    map.insert("dc", "b");

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("DC"), Some("b"));
}

#[test]
fn test_prefix_map_insert_if_absent() {
    let mut map = PrefixMap::new();
    assert!(map.insert_if_absent("x", "first"));
    assert!(!map.insert_if_absent("X", "second"));
    assert_eq!(map.get("x"), Some("first"));
}

#[test]
fn test_prefix_map_from_json() {
    let map: PrefixMap = serde_json::from_str(r#"{"LOC": "urn:loc", "": "urn:default"}"#).unwrap();
    assert_eq!(map.get("loc"), Some("urn:loc"));
    assert_eq!(map.get(""), Some("urn:default"));

    let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["", "loc"]);
}
