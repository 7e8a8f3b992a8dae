//! Recursive descent parser for CQL with one token of lookahead.
//!
//! ```text
//! query     := prefixes subquery ( boolean subquery | SORTBY sort_keys )*
//! subquery  := '(' query ')' | prefixes query | clause
//! clause    := index relation term | term
//! relation  := ( comparison | WORD ) modifiers
//! boolean   := ( 'and' | 'or' | 'not' | 'prox' ) modifiers
//! modifiers := ( '/' WORD ( comparison value )? )*
//! prefixes  := ( '>' ( WORD '=' )? identifier )*
//! sort_keys := ( index modifiers )+
//! ```

use std::mem;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{
        Boolean, BooleanOp, Comparator, CqlQuery, Index, ModifierClause, NodeId, PrefixMap,
        Relation, RelationKind, SearchClause, Term, Token,
        prefixes::{CQL_PREFIX, reserved_prefix},
        query::Arena,
    },
    config::ParserConfig,
    diagnostic::{Diagnostic, DiagnosticCode},
    lexer::Lexer,
};

/// Keyword introducing sort keys.
pub const SORT_WORD: &str = "sortby";

/// Index and relation of the implicit clause built from a bare term.
pub const SERVER_CHOICE_INDEX: &str = "serverchoice";

const TOO_DEEP: &str = "Query nesting too deep";

static ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\(.?)").expect("escape pattern is valid"));

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    next_token: Token,
    config: ParserConfig,
    arena: Arena,
    /// Prefix names declared by the enclosing subqueries, innermost last.
    scopes: Vec<Vec<String>>,
    /// Subqueries currently being parsed; bounded by `config.max_depth`.
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, Diagnostic> {
        Self::with_config(lexer, ParserConfig::default())
    }

    pub fn with_config(mut lexer: Lexer, config: ParserConfig) -> Result<Self, Diagnostic> {
        let current_token = lexer.next_token()?;
        let next_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            next_token,
            config,
            arena: Arena::default(),
            scopes: Vec::new(),
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), Diagnostic> {
        let next = self.lexer.next_token()?;
        self.current_token = mem::replace(&mut self.next_token, next);
        Ok(())
    }

    fn error(&self, code: DiagnosticCode, details: impl Into<String>) -> Diagnostic {
        Diagnostic::new(code, details, self.lexer.source())
    }

    fn syntax_error(&self, details: impl Into<String>) -> Diagnostic {
        self.error(DiagnosticCode::QuerySyntax, details)
    }

    fn is_boolean(token: &Token) -> bool {
        matches!(token, Token::Word(w) if BooleanOp::from_word(w).is_some())
    }

    /// Parse a complete query; any token left over is an error.
    pub fn parse(&mut self) -> Result<CqlQuery, Diagnostic> {
        let root = self.parse_query()?;

        if self.current_token != Token::Eof {
            return Err(self.syntax_error(format!(
                "Unprocessed tokens remain: '{}'",
                self.current_token
            )));
        }

        Ok(CqlQuery::new(
            self.lexer.source().to_string(),
            mem::take(&mut self.arena),
            root,
            self.config.default_prefixes.clone(),
        ))
    }

    fn parse_query(&mut self) -> Result<NodeId, Diagnostic> {
        let prefixes = self.parse_prefixes()?;
        self.with_prefixes(prefixes, Self::parse_boolean_chain)
    }

    /// Runs `parse` with `prefixes` in scope, then attaches them to the
    /// resulting subtree. Declarations already on that node are closer to it
    /// and are kept.
    fn with_prefixes(
        &mut self,
        prefixes: PrefixMap,
        parse: fn(&mut Self) -> Result<NodeId, Diagnostic>,
    ) -> Result<NodeId, Diagnostic> {
        if self.depth >= self.config.max_depth {
            return Err(self.syntax_error(TOO_DEEP));
        }

        if self.config.error_on_duplicate_prefix {
            for (name, _) in prefixes.iter() {
                if self.scopes.iter().flatten().any(|declared| declared == name) {
                    return Err(self.error(
                        DiagnosticCode::DuplicatePrefix,
                        format!("Duplicate prefix: {name}"),
                    ));
                }
            }
        }

        self.scopes
            .push(prefixes.iter().map(|(name, _)| name.to_string()).collect());
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        self.scopes.pop();
        let node = result?;

        let declared = &mut self.arena.get_mut(node).prefixes;
        for (name, identifier) in prefixes.iter() {
            declared.insert_if_absent(name, identifier);
        }
        Ok(node)
    }

    fn parse_boolean_chain(&mut self) -> Result<NodeId, Diagnostic> {
        let mut left = self.parse_subquery()?;

        loop {
            if Self::is_boolean(&self.current_token) {
                let boolean = self.parse_boolean()?;
                let right = self.parse_subquery()?;
                left = self.arena.triple(left, boolean, right);
                if self.arena.height(left) > self.config.max_depth {
                    return Err(self.syntax_error(TOO_DEEP));
                }
            } else if self.current_token.is_word(SORT_WORD) {
                self.advance()?;
                let keys = self.parse_sort_keys()?;
                self.arena.get_mut(left).sort_keys = keys;
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_subquery(&mut self) -> Result<NodeId, Diagnostic> {
        if self.current_token == Token::LParen {
            self.advance()?; // consume (
            let node = self.parse_query()?;
            if self.current_token != Token::RParen {
                return Err(self.syntax_error(self.current_token.to_string()));
            }
            self.advance()?; // consume )
            return Ok(node);
        }

        let prefixes = self.parse_prefixes()?;
        if prefixes.is_empty() {
            self.parse_clause()
        } else {
            self.with_prefixes(prefixes, Self::parse_boolean_chain)
        }
    }

    fn parse_prefixes(&mut self) -> Result<PrefixMap, Diagnostic> {
        let mut prefixes = PrefixMap::new();

        while self.current_token == Token::Gt {
            self.advance()?; // consume >

            let name = if self.next_token == Token::Eq {
                let name = match &self.current_token {
                    Token::Word(w) => w.to_lowercase(),
                    other => {
                        return Err(self.syntax_error(format!(
                            "Expected prefix name but got: {other}"
                        )));
                    }
                };
                self.advance()?; // name
                self.advance()?; // =
                name
            } else {
                String::new()
            };

            let identifier = self.parse_identifier()?;

            let redeclared = prefixes.contains(&name) || reserved_prefix(&name).is_some();
            if self.config.error_on_duplicate_prefix && redeclared {
                return Err(self.error(
                    DiagnosticCode::DuplicatePrefix,
                    format!("Duplicate prefix: {name}"),
                ));
            }
            prefixes.insert(&name, identifier);
        }

        Ok(prefixes)
    }

    /// Context set identifier of a prefix declaration. URIs are split on `/`
    /// by the lexer and glued back together here.
    fn parse_identifier(&mut self) -> Result<String, Diagnostic> {
        match &self.current_token {
            Token::Quoted(raw) => {
                if self.config.error_on_quoted_identifier {
                    return Err(self.error(DiagnosticCode::QuotesUnsupported, raw.as_str()));
                }
                let identifier = strip_quotes(raw).to_string();
                self.advance()?;
                Ok(identifier)
            }
            Token::Word(word) => {
                let mut identifier = word.clone();
                self.advance()?;
                while self.current_token == Token::Slash {
                    identifier.push('/');
                    self.advance()?;
                    if let Token::Word(segment) = &self.current_token {
                        identifier.push_str(segment);
                        self.advance()?;
                    }
                }
                Ok(identifier)
            }
            other => Err(self.syntax_error(format!(
                "Expected prefix identifier but got: {other}"
            ))),
        }
    }

    fn parse_clause(&mut self) -> Result<NodeId, Diagnostic> {
        let next_is_boolean = Self::is_boolean(&self.next_token);
        let next_is_sort = self.next_token.is_word(SORT_WORD);

        if !next_is_boolean
            && !next_is_sort
            && !matches!(self.next_token, Token::LParen | Token::RParen | Token::Eof)
        {
            let index = self.parse_index()?;
            self.advance()?; // index
            let relation = self.parse_relation()?;

            if self.current_token == Token::Eof {
                return Err(self.syntax_error("Expected Term, got end of query."));
            }
            let term = self.parse_term()?;
            self.advance()?; // term

            Ok(self.arena.clause(SearchClause::new(index, relation, term)))
        } else if self.current_token != Token::Eof
            && (next_is_boolean
                || next_is_sort
                || matches!(self.next_token, Token::RParen | Token::Eof))
        {
            let term = self.parse_term()?;
            self.advance()?; // term

            let clause = SearchClause::new(
                Index::new(CQL_PREFIX, SERVER_CHOICE_INDEX),
                Relation::new(RelationKind::Comparison(Comparator::Eq), Vec::new()),
                term,
            );
            Ok(self.arena.clause(clause))
        } else {
            Err(self.syntax_error(format!(
                "Expected Boolean or Relation but got: {}",
                self.current_token
            )))
        }
    }

    /// Index named by the current token. Does not advance.
    fn parse_index(&self) -> Result<Index, Diagnostic> {
        match &self.current_token {
            Token::Word(word) => self.split_index(word),
            Token::Quoted(raw) => {
                if self.config.error_on_quoted_identifier {
                    return Err(self.error(DiagnosticCode::QuotesUnsupported, raw.as_str()));
                }
                self.split_index(strip_quotes(raw))
            }
            other => Err(self.syntax_error(format!("Expected Index but got: {other}"))),
        }
    }

    /// `set.name` → prefix and name, both lower-cased.
    fn split_index(&self, value: &str) -> Result<Index, Diagnostic> {
        if value.matches('.').count() > 1 {
            return Err(self.error(
                DiagnosticCode::UnsupportedContextSet,
                format!("Multiple '.' characters: {value}"),
            ));
        }

        match value.split_once('.') {
            Some(("", _)) => Err(self.error(
                DiagnosticCode::UnsupportedContextSet,
                format!("Null indexset: {value}"),
            )),
            Some((prefix, name)) => Ok(Index::new(prefix.to_lowercase(), name.to_lowercase())),
            None => Ok(Index::new("", value)),
        }
    }

    fn parse_relation(&mut self) -> Result<Relation, Diagnostic> {
        let mut relation = match &self.current_token {
            Token::Word(w) => {
                let word = w.to_lowercase();
                self.split_index(&word)?;
                Relation::from_word(&word, Vec::new())
            }
            token => match Comparator::from_token(token) {
                Some(c) => Relation::new(RelationKind::Comparison(c), Vec::new()),
                None => {
                    return Err(self.syntax_error(format!("Expected Relation but got: {token}")));
                }
            },
        };

        self.advance()?; // relation
        relation.modifiers = self.parse_modifiers()?;
        Ok(relation)
    }

    fn parse_boolean(&mut self) -> Result<Boolean, Diagnostic> {
        let op = match &self.current_token {
            Token::Word(w) => BooleanOp::from_word(w),
            _ => None,
        };
        let Some(op) = op else {
            return Err(self.syntax_error(self.current_token.to_string()));
        };

        self.advance()?; // boolean
        let modifiers = self.parse_modifiers()?;
        Ok(Boolean::new(op, modifiers))
    }

    fn parse_modifiers(&mut self) -> Result<Vec<ModifierClause>, Diagnostic> {
        let mut modifiers = Vec::new();

        while self.current_token == Token::Slash {
            self.advance()?; // consume /

            let name = match &self.current_token {
                Token::Word(w) => self.split_index(&w.to_lowercase())?,
                Token::Slash | Token::Eof => return Err(self.syntax_error("Null modifier")),
                other => {
                    return Err(self.syntax_error(format!(
                        "Expected modifier name but got: {other}"
                    )));
                }
            };
            self.advance()?; // name

            match Comparator::from_token(&self.current_token) {
                Some(comparison) => {
                    self.advance()?; // comparison
                    if !self.current_token.is_text() {
                        return Err(self.syntax_error(format!(
                            "Expected modifier value but got: {}",
                            self.current_token
                        )));
                    }
                    let value = self.current_token.to_string();
                    self.advance()?; // value
                    modifiers.push(ModifierClause::new(name, Some(comparison), value));
                }
                None => modifiers.push(ModifierClause::new(name, None, "")),
            }
        }

        Ok(modifiers)
    }

    fn parse_sort_keys(&mut self) -> Result<Vec<Index>, Diagnostic> {
        if !self.current_token.is_text() {
            return Err(self.syntax_error("Sort with no keys"));
        }

        let mut keys = Vec::new();
        while self.current_token.is_text() {
            let index = self.parse_index()?;
            self.advance()?; // key
            let modifiers = self.parse_modifiers()?;
            keys.push(index.with_modifiers(modifiers));
        }
        Ok(keys)
    }

    /// Term carried by the current token. Does not advance.
    fn parse_term(&self) -> Result<Term, Diagnostic> {
        let raw = match &self.current_token {
            token if token.is_comparison() || *token == Token::Slash => {
                return Err(self.error(
                    DiagnosticCode::UnquotedSpecialCharacter,
                    token.to_string(),
                ));
            }
            Token::Word(s) | Token::Quoted(s) => s.clone(),
            Token::Symbol(c) => c.to_string(),
            other => {
                return Err(self.syntax_error(format!("Expected Term but got: {other}")));
            }
        };

        if raw.chars().all(|c| c == '^') {
            return Err(self.error(
                DiagnosticCode::AnchorPosition,
                format!("Only anchoring character(s) in term: {raw}"),
            ));
        }

        let inner = if matches!(self.current_token, Token::Quoted(_)) {
            strip_quotes(&raw).replace("\\\"", "\"")
        } else {
            raw.clone()
        };

        if inner.is_empty() && self.config.error_on_empty_term {
            return Err(self.error(DiagnosticCode::EmptyTerm, raw));
        }

        for escape in ESCAPE.captures_iter(&inner) {
            let escaped = escape.get(1).map_or("", |m| m.as_str());
            if !matches!(escaped, "?" | "\\" | "*" | "^") {
                return Err(self.error(DiagnosticCode::NonSpecialCharacterEscaped, inner));
            }
        }

        Ok(Term::new(raw))
    }
}

/// `"abc"` → `abc`; anything else unchanged.
fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
