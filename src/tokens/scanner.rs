use std::collections::HashMap;

use super::{Literal, Token, TokenType};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        HashMap::from([
            ("and", TokenType::And),
            ("class", TokenType::Class),
            ("else", TokenType::Else),
            ("false", TokenType::False),
            ("for", TokenType::For),
            ("fun", TokenType::Fun),
            ("if", TokenType::If),
            ("nil", TokenType::Nil),
            ("or", TokenType::Or),
            ("print", TokenType::Print),
            ("return", TokenType::Return),
            ("super", TokenType::Super),
            ("this", TokenType::This),
            ("true", TokenType::True),
            ("var", TokenType::Var),
            ("while", TokenType::While),
        ])
    };
}

pub struct Scanner {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Scanner {
        Scanner {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    // Lexical errors are collected rather than returned early, so a single
    // pass reports every bad character in the source.
    pub(crate) fn scan_tokens(&mut self) -> Result<Vec<Token>, Vec<String>> {
        let mut tokens = Vec::<Token>::new();
        let mut errors = Vec::<String>::new();

        while !self.is_at_end() {
            self.start = self.current;
            match self.scan_token() {
                Ok(None) => continue,
                Ok(Some(token)) => tokens.push(token),
                Err(error) => errors.push(error),
            }
        }

        self.start = self.current;
        tokens.push(self.new_token(TokenType::Eof, Literal::Nil));

        match errors.len() {
            0 => Ok(tokens),
            _ => Err(errors),
        }
    }

    fn scan_token(&mut self) -> Result<Option<Token>, String> {
        match self.advance() {
            '(' => Ok(Some(self.new_token(TokenType::LeftParen, Literal::Nil))),
            ')' => Ok(Some(self.new_token(TokenType::RightParen, Literal::Nil))),
            '{' => Ok(Some(self.new_token(TokenType::LeftBrace, Literal::Nil))),
            '}' => Ok(Some(self.new_token(TokenType::RightBrace, Literal::Nil))),
            ',' => Ok(Some(self.new_token(TokenType::Comma, Literal::Nil))),
            '.' => Ok(Some(self.new_token(TokenType::Dot, Literal::Nil))),
            '-' => Ok(Some(self.new_token(TokenType::Minus, Literal::Nil))),
            '+' => Ok(Some(self.new_token(TokenType::Plus, Literal::Nil))),
            ';' => Ok(Some(self.new_token(TokenType::Semicolon, Literal::Nil))),
            '*' => Ok(Some(self.new_token(TokenType::Star, Literal::Nil))),
            '!' => match self.peek() {
                '=' => {
                    self.advance();
                    Ok(Some(self.new_token(TokenType::BangEqual, Literal::Nil)))
                }
                _ => Ok(Some(self.new_token(TokenType::Bang, Literal::Nil))),
            },
            '=' => match self.peek() {
                '=' => {
                    self.advance();
                    Ok(Some(self.new_token(TokenType::EqualEqual, Literal::Nil)))
                }
                _ => Ok(Some(self.new_token(TokenType::Equal, Literal::Nil))),
            },
            '<' => match self.peek() {
                '=' => {
                    self.advance();
                    Ok(Some(self.new_token(TokenType::LessEqual, Literal::Nil)))
                }
                _ => Ok(Some(self.new_token(TokenType::Less, Literal::Nil))),
            },
            '>' => match self.peek() {
                '=' => {
                    self.advance();
                    Ok(Some(self.new_token(TokenType::GreaterEqual, Literal::Nil)))
                }
                _ => Ok(Some(self.new_token(TokenType::Greater, Literal::Nil))),
            },
            '/' => match self.peek() {
                '/' => {
                    self.advance();
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                    Ok(None)
                }
                _ => Ok(Some(self.new_token(TokenType::Slash, Literal::Nil))),
            },
            ' ' => Ok(None),
            '\r' => Ok(None),
            '\t' => Ok(None),
            '\n' => {
                self.line += 1;
                Ok(None)
            }
            '"' => self.parse_string(),
            c if self.is_digit(c) => self.parse_number(),
            c if self.is_alpha(c) => self.parse_identifier(),
            c => Err(format!(
                "[line {}] Error: Unexpected character: {}",
                self.line, c
            )),
        }
    }

    fn parse_string(&mut self) -> Result<Option<Token>, String> {
        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\n' {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return Err(format!("[line {}] Error: Unterminated string.", self.line));
        }

        // the closing "
        self.advance();

        // Trim the surrounding quotes
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        return Ok(Some(
            self.new_token(TokenType::String, Literal::String(value)),
        ));
    }

    fn parse_number(&mut self) -> Result<Option<Token>, String> {
        while !self.is_at_end() && self.is_digit(self.peek()) {
            self.advance();
        }

        if self.peek() == '.' && self.is_digit(self.peek_next()) {
            // consume the '.'
            self.advance();

            while !self.is_at_end() && self.is_digit(self.peek()) {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let value: f64 = text
            .parse()
            .map_err(|e| format!("[line {}] Error: Failed to parse number: {}", self.line, e))?;

        Ok(Some(
            self.new_token(TokenType::Number, Literal::Number(value)),
        ))
    }

    fn parse_identifier(&mut self) -> Result<Option<Token>, String> {
        while !self.is_at_end() && self.is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let token = match KEYWORDS.get(text.as_str()) {
            Some(&token_type) => self.new_token(token_type, Literal::Nil),
            None => self.new_token(TokenType::Identifier, Literal::Nil),
        };

        Ok(Some(token))
    }

    fn advance(&mut self) -> char {
        let value = self.peek();
        self.current += 1;
        return value;
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn new_token(&self, token_type: TokenType, literal: Literal) -> Token {
        let text: String = self.source[self.start..self.current].iter().collect();

        Token::new(token_type, text, literal, self.line)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn is_alpha_numeric(&self, c: char) -> bool {
        self.is_alpha(c) || self.is_digit(c)
    }

    fn is_alpha(&self, c: char) -> bool {
        match c {
            'a'..='z' => true,
            'A'..='Z' => true,
            '_' => true,
            _ => false,
        }
    }

    fn is_digit(&self, c: char) -> bool {
        '0' <= c && c <= '9'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source).scan_tokens().unwrap()
    }

    fn token_types(source: &str) -> Vec<TokenType> {
        scan(source).iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn single_and_double_character_tokens() {
        assert_eq!(
            token_types("(){},.-+;*/ ! != = == < <= > >="),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Minus,
                TokenType::Plus,
                TokenType::Semicolon,
                TokenType::Star,
                TokenType::Slash,
                TokenType::Bang,
                TokenType::BangEqual,
                TokenType::Equal,
                TokenType::EqualEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            token_types("var language = nil;"),
            vec![
                TokenType::Var,
                TokenType::Identifier,
                TokenType::Equal,
                TokenType::Nil,
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn number_literals() {
        let tokens = scan("12 3.5");

        assert_eq!(tokens[0].literal, Literal::Number(12.0));
        assert_eq!(tokens[1].literal, Literal::Number(3.5));
    }

    #[test]
    fn dot_without_fraction_is_not_consumed() {
        assert_eq!(
            token_types("12."),
            vec![TokenType::Number, TokenType::Dot, TokenType::Eof]
        );
    }

    #[test]
    fn string_literal_trims_quotes() {
        let tokens = scan("\"hello\"");

        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(tokens[0].literal, Literal::String("hello".to_string()));
    }

    #[test]
    fn multiline_string_counts_lines() {
        let tokens = scan("\"a\nb\"\nx");

        let x = tokens.iter().find(|t| t.lexeme == "x").unwrap();
        assert_eq!(x.line_number, 3);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            token_types("// nothing to see\n1"),
            vec![TokenType::Number, TokenType::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let errors = Scanner::new("\"oops").scan_tokens().unwrap_err();

        assert_eq!(errors, vec!["[line 1] Error: Unterminated string."]);
    }

    #[test]
    fn unexpected_character_reports_and_continues() {
        let errors = Scanner::new("@\n#").scan_tokens().unwrap_err();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: @",
                "[line 2] Error: Unexpected character: #",
            ]
        );
    }
}
