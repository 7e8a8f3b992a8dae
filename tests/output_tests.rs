// tests/output_tests.rs

use sru_cql::parse;

fn cql(query: &str) -> String {
    parse(query).unwrap().to_cql()
}

// ============================================================================
// CQL Output
// ============================================================================

#[test]
fn test_clause_output() {
    assert_eq!(cql("title = spam"), "title = spam");
    assert_eq!(cql("DC.Title ANY \"a b\""), "dc.title any \"a b\"");
    assert_eq!(cql("title foo.near x"), "title foo.near x");
}

#[test]
fn test_quoted_index_output() {
    assert_eq!(cql(r#""my index" = x"#), r#""my index" = x"#);
    assert_eq!(cql(r#""dc.My Title" = x"#), r#""dc.my title" = x"#);
    assert_eq!(cql(r#""" = x"#), r#""" = x"#);
    assert_eq!(cql(r#"a sortBy "my key""#), r#"cql.serverchoice = a sortBy "my key""#);
}

#[test]
fn test_bare_term_output() {
    assert_eq!(cql("cat"), "cql.serverchoice = cat");
}

#[test]
fn test_triples_are_parenthesized() {
    assert_eq!(
        cql("a and b or c"),
        "((cql.serverchoice = a and cql.serverchoice = b) or cql.serverchoice = c)"
    );
    assert_eq!(
        cql("a PROX/unit=word b"),
        "(cql.serverchoice = a prox/unit=word cql.serverchoice = b)"
    );
}

#[test]
fn test_root_prefixes() {
    assert_eq!(
        cql(r#">dc="http://example.org/dc" dc.title = y"#),
        r#">dc="http://example.org/dc" dc.title = y"#
    );
    assert_eq!(
        cql(">http://example.org/set title = x"),
        r#">"http://example.org/set" title = x"#
    );
}

#[test]
fn test_nested_prefixes_keep_their_scope() {
    assert_eq!(
        cql(r#"(>x="u" x.a = 1) and b"#),
        r#"((>x="u" x.a = 1) and cql.serverchoice = b)"#
    );
}

#[test]
fn test_sort_output() {
    assert_eq!(
        cql(r#""cat" sortBy title/sort.descending"#),
        r#"cql.serverchoice = "cat" sortBy title/sort.descending"#
    );
    assert_eq!(
        cql("(a sortBy t) and b"),
        "((cql.serverchoice = a sortBy t) and cql.serverchoice = b)"
    );
}

#[test]
fn test_output_parses_to_same_tree() {
    let queries = vec![
        "dc.title any/cql.stem fish",
        "a and (b or c) not d",
        r#">dc="http://example.org/dc" dc.title = x"#,
        r#"(>x="u1" x.a = 1) and x.b = 2"#,
        r#">x="outer" (x.a = 1 and >x="inner" x.b = 2)"#,
        r#""cat" sortBy title/sort.descending year"#,
        r#">"http://default" title = x"#,
        r#"year >= 1999 prox/unit=word title <> "a b""#,
        "(a sortBy t) and b",
        "title exact x or title foo.near y",
        r#""my index" = x and "dc.My Title" any y"#,
        r#""" = x sortBy "my key"/sort.descending"#,
    ];

    for input in queries {
        let first = parse(input).unwrap();
        let printed = first.to_cql();
        let second = parse(&printed).unwrap();

        assert_eq!(first.to_json(), second.to_json(), "Failed for input: {}", input);
        assert_eq!(printed, second.to_cql(), "Failed for input: {}", input);
    }
}

// ============================================================================
// JSON Output
// ============================================================================

#[test]
fn test_clause_json() {
    let json = parse("title any/cql.stem fish").unwrap().to_json();

    assert_eq!(json["type"], "searchClause");
    assert_eq!(json["index"]["prefix"], "");
    assert_eq!(json["index"]["name"], "title");
    assert!(json["index"].get("modifiers").is_none());
    assert_eq!(json["relation"]["prefix"], "cql");
    assert_eq!(json["relation"]["value"], "any");
    assert_eq!(json["relation"]["modifiers"][0]["type"], "cql.stem");
    assert_eq!(json["relation"]["modifiers"][0]["comparison"], "");
    assert_eq!(json["term"], "fish");
}

#[test]
fn test_triple_json() {
    let json = parse("a and/rel.combine=sum b").unwrap().to_json();

    assert_eq!(json["type"], "triple");
    assert_eq!(json["boolean"]["value"], "and");
    assert_eq!(json["boolean"]["modifiers"][0]["type"], "rel.combine");
    assert_eq!(json["boolean"]["modifiers"][0]["comparison"], "=");
    assert_eq!(json["boolean"]["modifiers"][0]["value"], "sum");
    assert_eq!(json["left"]["term"], "a");
    assert_eq!(json["right"]["index"]["name"], "serverchoice");
}

#[test]
fn test_prefixes_and_sort_keys_json() {
    let json = parse(r#">dc="http://example.org/dc" x sortBy dc.title/sort.ascending"#)
        .unwrap()
        .to_json();

    assert_eq!(json["prefixes"]["dc"], "http://example.org/dc");
    assert_eq!(json["sortKeys"][0]["prefix"], "dc");
    assert_eq!(json["sortKeys"][0]["name"], "title");
    assert_eq!(json["sortKeys"][0]["modifiers"][0]["type"], "sort.ascending");
}

#[test]
fn test_plain_clause_json_has_no_scope_keys() {
    let json = parse("x").unwrap().to_json();
    assert!(json.get("prefixes").is_none());
    assert!(json.get("sortKeys").is_none());
}
