use std::fmt;

/// Lexical token produced by the [`Lexer`](crate::lexer::Lexer).
///
/// Tokens render back to their source text through `Display`; [`Token::Eof`]
/// renders as the empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word: index names, relations, booleans, unquoted terms, URIs.
    ///
    /// # Examples
    /// ```text
    /// dc.title
    /// any
    /// cat*
    /// info:srw
    /// ```
    Word(String),

    /// Double-quoted string, kept verbatim including the surrounding quotes
    /// and any backslash escapes.
    ///
    /// # Examples
    /// ```text
    /// "spam hamm"
    /// "say \"hi\""
    /// ```
    Quoted(String),

    /// Left parenthesis opening a subquery
    LParen,

    /// Right parenthesis
    RParen,

    // Comparison
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`, also the prefix declaration marker
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `<>`
    NotEq,

    /// Modifier separator `/`
    Slash,

    /// Any other single character outside the word alphabet
    Symbol(char),

    /// End of input. Returned repeatedly once the input is exhausted.
    Eof,
}

impl Token {
    /// Comparison operators, the only tokens that may start a relation
    /// besides a word.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::Eq | Token::Lt | Token::Gt | Token::LtEq | Token::GtEq | Token::NotEq
        )
    }

    /// Words and quoted strings, i.e. anything that may name an index or
    /// carry a term.
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Quoted(_))
    }

    /// Case-insensitive keyword test against a bare word.
    pub fn is_word(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(s) | Token::Quoted(s) => f.write_str(s),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Eq => f.write_str("="),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::LtEq => f.write_str("<="),
            Token::GtEq => f.write_str(">="),
            Token::NotEq => f.write_str("<>"),
            Token::Slash => f.write_str("/"),
            Token::Symbol(c) => write!(f, "{c}"),
            Token::Eof => Ok(()),
        }
    }
}
