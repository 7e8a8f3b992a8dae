// tests/conformance_tests.rs
//
// End-to-end behaviour of the SRU endpoint: query string in, backend query
// or numbered diagnostic out.

use sru_cql::{DiagnosticCode, FieldMapping, parse};

fn dc_mapping() -> FieldMapping {
    [("anywhere", "cql.serverchoice")].into_iter().collect()
}

fn compile(query: &str) -> Result<String, u16> {
    parse(query)
        .and_then(|tree| tree.to_es(&dc_mapping(), &FieldMapping::new()))
        .map_err(|diagnostic| diagnostic.code.as_u16())
}

#[test]
fn test_phrase_search_anywhere() {
    assert_eq!(compile(r#"dc.anywhere all "spam hamm""#), Ok("(spam AND hamm)".to_string()));
}

#[test]
fn test_nested_parentheses() {
    assert_eq!(
        compile("((title=spam) or (subtitle=hamm)) or eggs"),
        Ok("((title:spam OR subtitle:hamm) OR eggs)".to_string())
    );
}

#[test]
fn test_range() {
    assert_eq!(compile("year > 1999"), Ok("year:>1999".to_string()));
}

#[test]
fn test_mixed_relations_and_booleans() {
    assert_eq!(
        compile("ind1 = 1 AND ind2 > 2 AND ind3 >= 3 AND ind4 < 4 AND ind5 <= 5 AND ind6 <> 6"),
        Ok(r#"(((((ind1:1 AND ind2:>2) AND ind3:>=3) AND ind4:<4) AND ind5:<=5) AND ind6:-"6")"#
            .to_string())
    );
}

#[test]
fn test_empty_query() {
    assert_eq!(compile(""), Err(10));
}

#[test]
fn test_proximity() {
    assert!(parse("dc.anywhere prox spam").is_ok());
    assert_eq!(compile("dc.anywhere prox spam"), Err(37));
}

#[test]
fn test_sort() {
    assert!(parse(r#""cat" sortBy title"#).is_ok());
    assert_eq!(compile(r#""cat" sortBy title"#), Err(80));
}

#[test]
fn test_relation_modifiers() {
    let query = r#"dc.anywhere all/cql.stem/rel.algorithm=okapi "spam""#;
    assert!(parse(query).is_ok());
    assert_eq!(compile(query), Err(21));
}

#[test]
fn test_diagnostic_carries_sru_uri() {
    let err = parse("dc.anywhere prox spam")
        .unwrap()
        .to_es(&dc_mapping(), &FieldMapping::new())
        .unwrap_err();
    assert_eq!(err.code, DiagnosticCode::UnsupportedBoolean);
    assert_eq!(err.uri(), "info:srw/diagnostic/1/37");
}
