// tests/cli_tests.rs

use sru_cql::cli::{
    CheckOptions, CheckResult, CliError, DocTopic, diagnostics_table, execute_check,
    get_doc_topic, get_docs_overview,
};
use sru_cql::{DiagnosticCode, Settings};

fn options(query: &str) -> CheckOptions {
    CheckOptions {
        query: query.to_string(),
        ..CheckOptions::default()
    }
}

// ============================================================================
// Check Command
// ============================================================================

#[test]
fn test_check_compiles() {
    match execute_check(&options("year > 1999")).unwrap() {
        CheckResult::Compiled {
            es, result_set_id, ..
        } => {
            assert_eq!(es, "year:>1999");
            assert_eq!(result_set_id, None);
        }
        other => panic!("Expected compiled result, got {:?}", other),
    }
}

#[test]
fn test_check_uses_settings() {
    let settings =
        Settings::from_json_str(r#"{"dc_mapping": {"anywhere": "cql.serverchoice"}}"#).unwrap();
    let options = CheckOptions {
        query: r#"dc.anywhere all "spam hamm""#.to_string(),
        settings,
        syntax_only: false,
    };

    match execute_check(&options).unwrap() {
        CheckResult::Compiled { es, .. } => assert_eq!(es, "(spam AND hamm)"),
        other => panic!("Expected compiled result, got {:?}", other),
    }
}

#[test]
fn test_check_reports_result_set() {
    let result = execute_check(&options("cql.resultSetId = rs1")).unwrap();
    let json = result.to_json();

    assert_eq!(json["resultSetId"], "rs1");
    assert_eq!(json["es"], "cql.resultsetid:rs1");
}

#[test]
fn test_syntax_only_skips_compilation() {
    let options = CheckOptions {
        syntax_only: true,
        ..options("a prox b")
    };

    let result = execute_check(&options).unwrap();
    assert!(matches!(result, CheckResult::SyntaxValid(_)));
    assert_eq!(result.query().source(), "a prox b");

    let json = result.to_json();
    assert_eq!(json["cql"], "(cql.serverchoice = a prox cql.serverchoice = b)");
    assert!(json.get("es").is_none());
}

#[test]
fn test_check_reports_diagnostic() {
    match execute_check(&options(r#""cat" sortBy title"#)) {
        Err(CliError::Diagnostic(diagnostic)) => {
            assert_eq!(diagnostic.code, DiagnosticCode::SortUnsupported);
        }
        other => panic!("Expected diagnostic, got {:?}", other),
    }
}

#[test]
fn test_check_json_output() {
    let json = execute_check(&options("title = spam")).unwrap().to_json();

    assert_eq!(json["query"], "title = spam");
    assert_eq!(json["cql"], "title = spam");
    assert_eq!(json["ast"]["type"], "searchClause");
    assert_eq!(json["es"], "title:spam");
    assert!(json["resultSetId"].is_null());
}

// ============================================================================
// Docs Command
// ============================================================================

#[test]
fn test_docs_overview_lists_topics() {
    let overview = get_docs_overview();
    for topic in ["syntax", "relations", "prefixes", "compilation", "diagnostics"] {
        assert!(overview.contains(topic), "Missing topic: {}", topic);
    }
}

#[test]
fn test_doc_topic_aliases() {
    assert_eq!(DocTopic::from_str("GRAMMAR"), Some(DocTopic::Syntax));
    assert_eq!(DocTopic::from_str("modifiers"), Some(DocTopic::Relations));
    assert_eq!(DocTopic::from_str("es"), Some(DocTopic::Compilation));
    assert_eq!(DocTopic::from_str("errors"), Some(DocTopic::Diagnostics));
    assert_eq!(DocTopic::from_str("nope"), None);
}

#[test]
fn test_doc_topics() {
    assert!(get_doc_topic("relations").unwrap().contains("title any"));
    assert!(get_doc_topic("prefixes").unwrap().contains("info:srw/cql-context-set/1/dc-v1.1"));
    assert!(get_doc_topic("compilation").unwrap().contains("NOT(a AND b)"));
}

#[test]
fn test_unknown_doc_topic() {
    match get_doc_topic("nope") {
        Err(CliError::UnknownTopic(name)) => assert_eq!(name, "nope"),
        other => panic!("Expected unknown topic, got {:?}", other),
    }
}

#[test]
fn test_diagnostics_table() {
    let table = diagnostics_table();
    for code in DiagnosticCode::ALL {
        assert!(table.contains(&code.uri()), "Missing code: {}", code);
        assert!(table.contains(code.message()));
    }
    assert_eq!(get_doc_topic("diagnostics").unwrap(), table);
}
