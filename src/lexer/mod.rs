//! Hand-written, single left-to-right pass over the source buffer.
//!
//! Grounded on the teacher's oldest revision (`src/lexer.rs`, a plain
//! `Peekable<Chars>` state machine with position tracking and a bottom-of-file
//! `#[cfg(test)]` block) rather than the newer `pesca_parser_derive`-table
//! lexer, which encodes a keyword set for a different, larger language.

mod token;

pub use token::{Token, TokenKind};

use std::fmt::Display;

/// Characters the language treats as identifier constituents: `_` plus ASCII
/// letters. Digits are deliberately excluded, so `a1` lexes as `a` then `1`.
fn is_letter(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n' | '\t')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnterminatedString { position: usize },
    UnrecognizedChar { position: usize, found: char },
    BareBang { position: usize },
    BareMinus { position: usize },
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnterminatedString { position } => {
                write!(f, "unterminated string at position {position}")
            }
            LexError::UnrecognizedChar { position, found } => {
                write!(f, "unrecognized char '{found}' at position {position}")
            }
            LexError::BareBang { position } => {
                write!(f, "unrecognized character '!' at position {position}")
            }
            LexError::BareMinus { position } => {
                write!(f, "unrecognized character '-' at position {position}")
            }
        }
    }
}

impl std::error::Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

/// Consumes the source once, left to right. `cursor` tracks the next
/// character to read; `start` marks the beginning of the token currently
/// being scanned, so position reporting (e.g. unterminated strings) can refer
/// back to where a token began rather than where the scan failed.
#[derive(Debug, Clone)]
pub struct Lexer {
    content: Vec<char>,
    cursor: usize,
    start: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            content: source.chars().collect(),
            cursor: 0,
            start: 0,
        }
    }

    fn chr(&self) -> Option<char> {
        self.content.get(self.cursor).copied()
    }

    fn nchr(&self) -> Option<char> {
        self.content.get(self.cursor + 1).copied()
    }

    fn advance(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor += 1;
        }
    }

    fn trim_whitespace(&mut self) {
        while self.chr().is_some_and(is_space) {
            self.advance();
        }
    }

    fn trim_comment(&mut self) {
        while let Some(c) = self.chr() {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn lex_number(&mut self) -> Token {
        while self.chr().is_some_and(is_digit) {
            self.advance();
        }

        let lexeme: String = self.content[self.start..self.cursor].iter().collect();
        // the grammar only ever produces a digit run here, so this never fails
        let value = lexeme.parse::<u64>().expect("digit run is valid u64");

        Token::Number {
            value,
            position: self.start,
        }
    }

    fn lex_symbol(&mut self) -> Token {
        while self.chr().is_some_and(is_letter) {
            self.advance();
        }

        Token::Symbol {
            lexeme: self.content[self.start..self.cursor].iter().collect(),
            position: self.start,
        }
    }

    fn lex_string(&mut self) -> LexResult<Token> {
        self.advance(); // opening quote

        let body_start = self.cursor;

        while self.chr().is_some_and(|c| c != '\'') {
            self.advance();
        }

        if self.chr() != Some('\'') {
            return Err(LexError::UnterminatedString {
                position: self.start + 1,
            });
        }

        let lexeme: String = self.content[body_start..self.cursor].iter().collect();
        self.advance(); // closing quote

        Ok(Token::String {
            lexeme,
            position: self.start,
        })
    }

    fn lex_punctuation(&mut self) -> LexResult<Token> {
        let position = self.start;
        let c = self.chr().expect("caller checked a character is present");
        self.advance();

        let token = match c {
            '(' => Token::LParen { position },
            ')' => Token::RParen { position },
            '{' => Token::LBrace { position },
            '}' => Token::RBrace { position },
            ';' => Token::Semi { position },
            '<' => Token::Lt { position },
            '>' => Token::Gt { position },
            '=' => {
                if self.chr() == Some('=') {
                    self.advance();
                    Token::Eq { position }
                } else {
                    Token::Assign { position }
                }
            }
            '!' => {
                if self.chr() == Some('=') {
                    self.advance();
                    Token::Neq { position }
                } else {
                    return Err(LexError::BareBang { position });
                }
            }
            '-' => {
                if self.chr() == Some('-') {
                    self.advance();
                    Token::MinusMinus { position }
                } else {
                    return Err(LexError::BareMinus { position });
                }
            }
            '+' => {
                if self.chr() == Some('+') {
                    self.advance();
                    Token::PlusPlus { position }
                } else {
                    Token::Plus { position }
                }
            }
            other => return Err(LexError::UnrecognizedChar { position, found: other }),
        };

        Ok(token)
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.trim_whitespace();
            self.start = self.cursor;

            let Some(c) = self.chr() else {
                tokens.push(Token::Eof {
                    position: self.cursor,
                });
                break;
            };

            if c == '#' {
                self.trim_comment();
                continue;
            }

            let token = if is_digit(c) {
                self.lex_number()
            } else if is_letter(c) {
                self.lex_symbol()
            } else if c == '\'' {
                self.lex_string()?
            } else {
                self.lex_punctuation()?
            };

            tokens.push(token);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_empty_source_to_eof_only() {
        let tokens = Lexer::new("").lex().unwrap();
        assert_eq!(tokens, vec![Token::Eof { position: 0 }]);
    }

    #[test]
    fn lexes_comment_only_source_to_eof_only() {
        let tokens = Lexer::new("# just a comment\n# another one").lex().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Eof);
    }

    #[test]
    fn lexes_symbol() {
        let tokens = Lexer::new("println").lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Symbol {
                    lexeme: "println".into(),
                    position: 0
                },
                Token::Eof { position: 7 }
            ]
        );
    }

    #[test]
    fn identifier_stops_before_digit() {
        let tokens = Lexer::new("a1").lex().unwrap();
        assert_eq!(
            tokens[0],
            Token::Symbol {
                lexeme: "a".into(),
                position: 0
            }
        );
        assert_eq!(
            tokens[1],
            Token::Number {
                value: 1,
                position: 1
            }
        );
    }

    #[test]
    fn lexes_number() {
        let tokens = Lexer::new("1337").lex().unwrap();
        assert_eq!(
            tokens[0],
            Token::Number {
                value: 1337,
                position: 0
            }
        );
    }

    #[test]
    fn lexes_string_without_escapes() {
        let tokens = Lexer::new("'hello world'").lex().unwrap();
        assert_eq!(
            tokens[0],
            Token::String {
                lexeme: "hello world".into(),
                position: 0
            }
        );
    }

    #[test]
    fn unterminated_string_reports_start_plus_one() {
        let err = Lexer::new("'oops").lex().unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { position: 1 });
    }

    #[test]
    fn multi_char_punctuation() {
        let tokens = Lexer::new("== != ++ -- = < > +").lex().unwrap();
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Eq,
                TokenKind::Neq,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Assign,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Plus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_bang_is_an_error() {
        let err = Lexer::new("!").lex().unwrap_err();
        assert_eq!(err, LexError::BareBang { position: 0 });
    }

    #[test]
    fn bare_minus_is_an_error() {
        let err = Lexer::new("-").lex().unwrap_err();
        assert_eq!(err, LexError::BareMinus { position: 0 });
    }

    #[test]
    fn for_loop_header_tokens() {
        let tokens = Lexer::new("for 0 as i; < 3; ++ {").lex().unwrap();
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Semi,
                TokenKind::Lt,
                TokenKind::Number,
                TokenKind::Semi,
                TokenKind::PlusPlus,
                TokenKind::LBrace,
                TokenKind::Eof,
            ]
        );
    }
}
