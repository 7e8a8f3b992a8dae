use crate::ast::Token;
use crate::config::DEFAULT_WORD_CHARS;
use crate::diagnostic::Diagnostic;

pub struct Lexer {
    source: String,
    input: Vec<char>,
    position: usize,
    word_chars: String,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_word_chars(input, DEFAULT_WORD_CHARS)
    }

    /// Lexer whose bare words admit `word_chars` besides alphanumerics.
    pub fn with_word_chars(input: &str, word_chars: &str) -> Self {
        Lexer {
            source: input.to_string(),
            input: input.chars().collect(),
            position: 0,
            word_chars: word_chars.to_string(),
        }
    }

    /// The full input, echoed into diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_word_char(&self, ch: char) -> bool {
        ch.is_alphanumeric() || self.word_chars.contains(ch)
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\\' {
                // Keep the escape and whatever it escapes, term checks come later
                result.push(ch);
                self.advance();
                if let Some(escaped) = self.current_char() {
                    result.push(escaped);
                    self.advance();
                }
            } else if self.is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted string, returning it with both quotes in place.
    fn read_quoted(&mut self) -> Result<String, Diagnostic> {
        let mut result = String::from('"');
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    result.push(ch);
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    result.push(ch);
                    self.advance();
                    if let Some(escaped) = self.current_char() {
                        result.push(escaped);
                        self.advance();
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(Diagnostic::syntax(result, self.source.as_str()))
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn pair(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    /// Next token; [`Token::Eof`] forever once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('"') => Token::Quoted(self.read_quoted()?),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('/') => self.single(Token::Slash),
            Some('=') => self.single(Token::Eq),
            Some('<') => match self.peek_char(1) {
                Some('=') => self.pair(Token::LtEq),
                Some('>') => self.pair(Token::NotEq),
                _ => self.single(Token::Lt),
            },
            Some('>') => match self.peek_char(1) {
                Some('=') => self.pair(Token::GtEq),
                _ => self.single(Token::Gt),
            },
            Some(ch) if ch == '\\' || self.is_word_char(ch) => Token::Word(self.read_word()),
            Some(ch) => self.single(Token::Symbol(ch)),
        };

        tracing::trace!(position = self.position, token = ?token, "lexed CQL token");
        Ok(token)
    }
}

#[test]
fn test_comparison_pairs() {
    let mut lexer = Lexer::new("a>=1 b <> 2 c<=3");
    assert_eq!(lexer.next_token().unwrap(), Token::Word("a".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Word("1".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Word("b".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::NotEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Word("2".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Word("c".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::LtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Word("3".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_modifier_separator() {
    let mut lexer = Lexer::new("any/cql.stem");
    assert_eq!(lexer.next_token().unwrap(), Token::Word("any".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Slash);
    assert_eq!(lexer.next_token().unwrap(), Token::Word("cql.stem".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}
