//! SRU diagnostics raised by the CQL pipeline.
//!
//! Every lexical, grammatical or unsupported-feature violation is reported as a
//! [`Diagnostic`] carrying one of the numbered codes of the SRU diagnostic set.
//! Clients branch on the numeric code, so codes and message texts are stable.
//!
//! # Examples
//!
//! ```
//! use sru_cql::{parse, DiagnosticCode};
//!
//! let err = parse("").unwrap_err();
//! assert_eq!(err.code, DiagnosticCode::QuerySyntax);
//! assert_eq!(err.uri(), "info:srw/diagnostic/1/10");
//! ```

use std::fmt::{self, Write};

use quick_xml::escape::escape;

/// Prefix shared by every diagnostic URI.
pub const URI_PREFIX: &str = "info:srw/diagnostic/1/";

const SRW_NAMESPACE: &str = "http://www.loc.gov/zing/srw/";
const DIAGNOSTIC_NAMESPACE: &str = "http://www.loc.gov/zing/srw/diagnostic/";
const SRU_VERSION: &str = "1.1";

/// The subset of the SRU diagnostic catalog this crate can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DiagnosticCode {
    /// Malformed query, trailing tokens, missing term.
    QuerySyntax = 10,
    /// Quoted identifier in strict mode.
    QuotesUnsupported = 14,
    /// Index name with several dots or an empty context set.
    UnsupportedContextSet = 15,
    UnsupportedRelation = 19,
    UnsupportedModifiers = 21,
    /// A bare comparison operator where a term belongs.
    UnquotedSpecialCharacter = 25,
    /// Backslash not followed by `? \ * ^`.
    NonSpecialCharacterEscaped = 26,
    EmptyTerm = 27,
    /// Term made only of `^`.
    AnchorPosition = 32,
    UnsupportedBoolean = 37,
    DuplicatePrefix = 45,
    SortUnsupported = 80,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 12] = [
        DiagnosticCode::QuerySyntax,
        DiagnosticCode::QuotesUnsupported,
        DiagnosticCode::UnsupportedContextSet,
        DiagnosticCode::UnsupportedRelation,
        DiagnosticCode::UnsupportedModifiers,
        DiagnosticCode::UnquotedSpecialCharacter,
        DiagnosticCode::NonSpecialCharacterEscaped,
        DiagnosticCode::EmptyTerm,
        DiagnosticCode::AnchorPosition,
        DiagnosticCode::UnsupportedBoolean,
        DiagnosticCode::DuplicatePrefix,
        DiagnosticCode::SortUnsupported,
    ];

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Looks up a catalog entry by its number.
    pub fn from_u16(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_u16() == code)
    }

    /// Standard SRU message text for this code.
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticCode::QuerySyntax => "Query syntax error",
            DiagnosticCode::QuotesUnsupported => "Invalid or unsupported use of quotes",
            DiagnosticCode::UnsupportedContextSet => "Unsupported context set",
            DiagnosticCode::UnsupportedRelation => "Unsupported relation",
            DiagnosticCode::UnsupportedModifiers => "Unsupported combination of relation modifers",
            DiagnosticCode::UnquotedSpecialCharacter => "Special characters not quoted in term",
            DiagnosticCode::NonSpecialCharacterEscaped => "Non special character escaped in term",
            DiagnosticCode::EmptyTerm => "Empty term unsupported",
            DiagnosticCode::AnchorPosition => "Anchoring character in unsupported position",
            DiagnosticCode::UnsupportedBoolean => "Unsupported boolean operator",
            DiagnosticCode::DuplicatePrefix => "Prefix assigned to multiple identifiers",
            DiagnosticCode::SortUnsupported => "Sort not supported",
        }
    }

    pub fn uri(self) -> String {
        format!("{URI_PREFIX}{}", self.as_u16())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// A numbered SRU diagnostic.
///
/// Built once at the point of violation and never mutated afterwards. Two
/// diagnostics compare equal when their code and details match; the echoed
/// query is carried along for rendering only.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub details: String,
    /// The original query string, as received.
    pub query: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, details: impl Into<String>, query: impl Into<String>) -> Self {
        Diagnostic {
            code,
            details: details.into(),
            query: query.into(),
        }
    }

    /// Shorthand for the generic syntax error (code 10).
    pub fn syntax(details: impl Into<String>, query: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticCode::QuerySyntax, details, query)
    }

    pub fn uri(&self) -> String {
        self.code.uri()
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }

    /// Renders the diagnostic as an SRU `searchRetrieveResponse` document with
    /// zero records, echoing the original query.
    pub fn render_xml(&self) -> Vec<u8> {
        let mut xml = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_xml(&mut xml);
        xml.into_bytes()
    }

    fn write_xml(&self, xml: &mut String) -> fmt::Result {
        writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            xml,
            r#"<searchRetrieveResponse xmlns="{SRW_NAMESPACE}" xmlns:diag="{DIAGNOSTIC_NAMESPACE}">"#
        )?;
        writeln!(xml, "  <version>{SRU_VERSION}</version>")?;
        writeln!(xml, "  <numberOfRecords>0</numberOfRecords>")?;
        writeln!(xml, "  <diagnostics>")?;
        writeln!(xml, "    <diag:diagnostic>")?;
        writeln!(xml, "      <diag:uri>{}</diag:uri>", self.uri())?;
        if !self.details.is_empty() {
            writeln!(xml, "      <diag:details>{}</diag:details>", escape(self.details.as_str()))?;
        }
        writeln!(xml, "      <diag:message>{}</diag:message>", escape(self.message()))?;
        writeln!(xml, "    </diag:diagnostic>")?;
        writeln!(xml, "  </diagnostics>")?;
        writeln!(xml, "  <echoedSearchRetrieveRequest>")?;
        writeln!(xml, "    <version>{SRU_VERSION}</version>")?;
        writeln!(xml, "    <query>{}</query>", escape(self.query.as_str()))?;
        writeln!(xml, "  </echoedSearchRetrieveRequest>")?;
        writeln!(xml, "</searchRetrieveResponse>")
    }
}

impl PartialEq for Diagnostic {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.details == other.details
    }
}

impl Eq for Diagnostic {}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.uri(), self.message(), self.details)
    }
}

impl std::error::Error for Diagnostic {}
