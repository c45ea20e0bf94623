//! Filter lexer - tokenizes `$filter` text.
//!
//! Handles the OData literal forms: quoted strings with `''` escapes,
//! numeric literals with `L`/`M`/`F`/`D` suffixes, and the typed literals
//! `datetime'...'`, `guid'...'` and `binary'...'`/`X'...'`.

use crate::error::{Error, Result};
use crate::token::{Token, TokenType};

/// The filter expression lexer.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();
        Self {
            chars,
            position: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.current_char else {
            return Ok(Token::eof(start));
        };

        match c {
            '(' => {
                self.advance();
                Ok(Token::new(TokenType::OpenParen, "(".into(), start))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenType::CloseParen, ")".into(), start))
            }
            ',' => {
                self.advance();
                Ok(Token::new(TokenType::Comma, ",".into(), start))
            }
            '/' => {
                self.advance();
                Ok(Token::new(TokenType::Slash, "/".into(), start))
            }
            '-' => {
                self.advance();
                Ok(Token::new(TokenType::Minus, "-".into(), start))
            }
            '\'' => {
                let value = self.read_quoted(start)?;
                Ok(Token::new(TokenType::StringLiteral, value, start))
            }
            c if c.is_ascii_digit() => self.read_number(start),
            c if c.is_alphabetic() || c == '_' => self.read_identifier_or_typed_literal(start),
            other => Err(Error::Syntax {
                message: format!("Unexpected character '{other}'"),
                position: start,
            }),
        }
    }

    /// Read the body of a `'...'` literal; `''` is an escaped quote.
    fn read_quoted(&mut self, start: usize) -> Result<String> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.current_char {
                Some('\'') if self.peek() == Some('\'') => {
                    value.push('\'');
                    self.advance();
                    self.advance();
                }
                Some('\'') => {
                    self.advance();
                    return Ok(value);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(Error::Syntax {
                        message: "Unterminated string literal".into(),
                        position: start,
                    })
                }
            }
        }
    }

    fn read_number(&mut self, start: usize) -> Result<Token> {
        let mut value = String::new();
        let mut has_dot = false;
        let mut has_exponent = false;

        while let Some(c) = self.current_char {
            match c {
                '0'..='9' => value.push(c),
                '.' if !has_dot && !has_exponent => {
                    has_dot = true;
                    value.push(c);
                }
                'e' | 'E' if !has_exponent => {
                    has_exponent = true;
                    value.push(c);
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.advance();
                        value.push(self.current_char.unwrap_or_default());
                    }
                }
                _ => break,
            }
            self.advance();
        }

        // Optional one-letter type suffix.
        let token_type = match self.current_char {
            Some('L') | Some('l') => {
                self.advance();
                if has_dot || has_exponent {
                    return Err(Error::Syntax {
                        message: "Int64 literal cannot have a fractional part".into(),
                        position: start,
                    });
                }
                TokenType::Int64Literal
            }
            Some('M') | Some('m') => {
                self.advance();
                TokenType::DecimalLiteral
            }
            Some('F') | Some('f') => {
                self.advance();
                TokenType::SingleLiteral
            }
            Some('D') | Some('d') => {
                self.advance();
                TokenType::DoubleLiteral
            }
            _ if has_dot || has_exponent => TokenType::DoubleLiteral,
            _ => TokenType::IntegerLiteral,
        };

        Ok(Token::new(token_type, value, start))
    }

    fn read_identifier_or_typed_literal(&mut self, start: usize) -> Result<Token> {
        let mut word = String::new();
        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // A quote directly after certain words introduces a typed literal.
        if self.current_char == Some('\'') {
            let token_type = match word.as_str() {
                "datetime" => Some(TokenType::DateTimeLiteral),
                "guid" => Some(TokenType::GuidLiteral),
                "binary" | "X" => Some(TokenType::BinaryLiteral),
                _ => None,
            };
            if let Some(token_type) = token_type {
                let value = self.read_quoted(start)?;
                return Ok(Token::new(token_type, value, start));
            }
        }

        let token_type = match word.as_str() {
            "true" | "false" => TokenType::BooleanLiteral,
            "null" => TokenType::NullLiteral,
            _ => TokenType::Identifier,
        };
        Ok(Token::new(token_type, word, start))
    }
}
