//! Lexer (tokenizer) for infix expressions
//!
//! Converts raw expression text into a flat [`Token`] sequence consumed by the
//! step engine. Whitespace is stripped before scanning, so it never separates
//! tokens: `1 2` reads as the single operand `12`.
//!
//! Any character that starts neither a numeric literal nor an operator or
//! parenthesis aborts the scan with a [`TokenizationError`]; nothing is skipped.

use super::ids::{IdSource, TokenId};
use super::operators::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Operand,
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// One occurrence of a token in an expression.
///
/// Two tokens with the same `value` (for example two `(`) are told apart by
/// their `id`, which follows the occurrence through every container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn operand(id: TokenId, value: impl Into<String>) -> Self {
        Token {
            id,
            value: value.into(),
            kind: TokenKind::Operand,
        }
    }

    pub fn operator(id: TokenId, op: Operator) -> Self {
        Token {
            id,
            value: op.symbol().to_string(),
            kind: TokenKind::Operator(op),
        }
    }

    pub fn left_paren(id: TokenId) -> Self {
        Token {
            id,
            value: "(".to_string(),
            kind: TokenKind::LeftParen,
        }
    }

    pub fn right_paren(id: TokenId) -> Self {
        Token {
            id,
            value: ")".to_string(),
            kind: TokenKind::RightParen,
        }
    }

    pub fn is_paren(&self) -> bool {
        matches!(self.kind, TokenKind::LeftParen | TokenKind::RightParen)
    }

    /// The operator carried by this token, if it is one.
    pub fn as_operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.value)
    }
}

/// Input contained a character that matches no token pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tokenization error at position {position}: unexpected character '{found}'")]
pub struct TokenizationError {
    pub found: char,
    /// Char offset in the original, unstripped input.
    pub position: usize,
}

/// Lexer for infix expressions
pub struct Lexer<'a> {
    /// Non-whitespace characters paired with their offset in the source.
    input: Vec<(usize, char)>,
    position: usize,
    ids: &'a dyn IdSource,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer drawing token ids from `ids`.
    pub fn new(input: &str, ids: &'a dyn IdSource) -> Self {
        Self {
            input: input
                .chars()
                .enumerate()
                .filter(|(_, ch)| !ch.is_whitespace())
                .collect(),
            position: 0,
            ids,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TokenizationError> {
        let mut tokens = Vec::new();

        while let Some((offset, ch)) = self.peek() {
            let token = self.next_token(offset, ch)?;
            tracing::trace!(id = %token.id, value = %token.value, "token");
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn next_token(&mut self, offset: usize, ch: char) -> Result<Token, TokenizationError> {
        if ch.is_ascii_digit() {
            return Ok(self.number_literal());
        }

        let token = match ch {
            '(' => Token::left_paren(self.ids.next_id()),
            ')' => Token::right_paren(self.ids.next_id()),
            _ => match Operator::from_char(ch) {
                Some(op) => Token::operator(self.ids.next_id(), op),
                None => {
                    return Err(TokenizationError {
                        found: ch,
                        position: offset,
                    })
                }
            },
        };
        self.advance();
        Ok(token)
    }

    /// Scan `digits [ '.' digits* ]`
    fn number_literal(&mut self) -> Token {
        let mut literal = String::new();

        while let Some((_, ch)) = self.peek().filter(|(_, c)| c.is_ascii_digit()) {
            literal.push(ch);
            self.advance();
        }

        if let Some((_, '.')) = self.peek() {
            literal.push('.');
            self.advance();
            while let Some((_, ch)) = self.peek().filter(|(_, c)| c.is_ascii_digit()) {
                literal.push(ch);
                self.advance();
            }
        }

        Token::operand(self.ids.next_id(), literal)
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }
}

/// Tokenize `input`, drawing ids from `ids`.
pub fn tokenize(input: &str, ids: &dyn IdSource) -> Result<Vec<Token>, TokenizationError> {
    Lexer::new(input, ids).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ids::SequentialIds;
    use std::collections::HashSet;

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let ids = SequentialIds::new();
        let tokens = tokenize("3+4*2", &ids).unwrap();

        assert_eq!(values(&tokens), vec!["3", "+", "4", "*", "2"]);
        assert!(matches!(tokens[0].kind, TokenKind::Operand));
        assert!(matches!(tokens[1].kind, TokenKind::Operator(Operator::Add)));
        assert!(matches!(tokens[3].kind, TokenKind::Operator(Operator::Multiply)));
    }

    #[test]
    fn test_parens_and_whitespace() {
        let ids = SequentialIds::new();
        let tokens = tokenize(" ( 7 + 4 ) ", &ids).unwrap();

        assert_eq!(values(&tokens), vec!["(", "7", "+", "4", ")"]);
        assert!(matches!(tokens[0].kind, TokenKind::LeftParen));
        assert!(matches!(tokens[4].kind, TokenKind::RightParen));
    }

    #[test]
    fn test_whitespace_joins_digits() {
        let ids = SequentialIds::new();
        let tokens = tokenize("1 2+3", &ids).unwrap();
        assert_eq!(values(&tokens), vec!["12", "+", "3"]);
    }

    #[test]
    fn test_decimal_literals() {
        let ids = SequentialIds::new();
        let tokens = tokenize("3.14*2.", &ids).unwrap();
        assert_eq!(values(&tokens), vec!["3.14", "*", "2."]);
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids = SequentialIds::new();
        let tokens = tokenize("((1))", &ids).unwrap();
        let seen: HashSet<TokenId> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(seen.len(), tokens.len());
        assert_eq!(tokens[0].id, TokenId(0));
        assert_eq!(tokens[4].id, TokenId(4));
    }

    #[test]
    fn test_unknown_character_aborts() {
        let ids = SequentialIds::new();
        let err = tokenize("1 + x", &ids).unwrap_err();
        assert_eq!(
            err,
            TokenizationError {
                found: 'x',
                position: 4
            }
        );
    }

    #[test]
    fn test_malformed_number() {
        let ids = SequentialIds::new();
        assert_eq!(tokenize(".5", &ids).unwrap_err().found, '.');
        assert_eq!(tokenize("1.2.3", &ids).unwrap_err().position, 3);
    }

    #[test]
    fn test_empty_input() {
        let ids = SequentialIds::new();
        assert!(tokenize("   ", &ids).unwrap().is_empty());
    }
}
