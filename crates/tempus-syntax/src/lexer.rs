//! Lexer for the constraint mini-language.

use crate::token::{Span, Token, TokenKind};
use std::str::Chars;

/// Hand-written lexer over a single constraint string.
pub struct Lexer<'a> {
    /// Character iterator.
    chars: Chars<'a>,
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            pos: 0,
            token_start: 0,
        }
    }

    /// Tokenize the entire source, returning all tokens including EOF.
    /// Unknown characters become an `Ident` of one character so the parser
    /// reports them with a span instead of the lexer panicking.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.token_start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        if c.is_ascii_digit() {
            return self.lex_number();
        }
        if c.is_alphabetic() || c == '_' {
            return self.lex_identifier();
        }
        self.lex_operator()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.token_start, self.pos))
    }

    fn lex_number(&mut self) -> Token {
        // Saturate rather than wrap; literals anywhere near the limit are
        // outside every sensible time horizon anyway.
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            if let Some(digit) = c.to_digit(10) {
                value = value.saturating_mul(10).saturating_add(i64::from(digit));
                self.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Integer(value))
    }

    fn lex_identifier(&mut self) -> Token {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match name.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "exists" => TokenKind::Exists,
            "mod" => TokenKind::Mod,
            _ => TokenKind::Ident(name),
        };
        self.make_token(kind)
    }

    fn lex_operator(&mut self) -> Token {
        let c = self.advance().expect("caller checked non-empty");
        let kind = match c {
            '=' if self.eat('=') => TokenKind::EqEq,
            '!' if self.eat('=') => TokenKind::NotEq,
            '!' => TokenKind::Bang,
            '<' if self.eat('=') => TokenKind::Le,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::Ge,
            '>' => TokenKind::Gt,
            '&' if self.eat('&') => TokenKind::AndAnd,
            '|' if self.eat('|') => TokenKind::OrOr,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            other => TokenKind::Ident(other.to_string()),
        };
        self.make_token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lex_comparison() {
        assert_eq!(
            kinds("time >= 5"),
            vec![
                TokenKind::Ident("time".to_string()),
                TokenKind::Ge,
                TokenKind::Integer(5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_and_operators() {
        assert_eq!(
            kinds("exists k: time % 2 == 1 && !false"),
            vec![
                TokenKind::Exists,
                TokenKind::Ident("k".to_string()),
                TokenKind::Colon,
                TokenKind::Ident("time".to_string()),
                TokenKind::Percent,
                TokenKind::Integer(2),
                TokenKind::EqEq,
                TokenKind::Integer(1),
                TokenKind::AndAnd,
                TokenKind::Bang,
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_cover_lexemes() {
        let tokens = Lexer::new("time <= 10").tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].span, Span::new(5, 7));
        assert_eq!(tokens[2].span, Span::new(8, 10));
    }

    #[test]
    fn test_unknown_character_becomes_ident() {
        let tokens = Lexer::new("time @ 3").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Ident("@".to_string()));
    }
}
