//! Token storage addressed by id
//!
//! Steps never hold token copies, only [`TokenId`]s. The [`TokenArena`] is the
//! single owner of the tokens a trace refers to and resolves ids back to
//! tokens for renderers and narration.

use crate::parser::ids::TokenId;
use crate::parser::lexer::Token;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};

/// Tokens of one trace, in the order the engine processed them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<Token>")]
pub struct TokenArena {
    order: Vec<TokenId>,
    tokens: FxHashMap<TokenId, Token>,
}

impl TokenArena {
    pub fn new(tokens: &[Token]) -> Self {
        let mut arena = TokenArena {
            order: Vec::with_capacity(tokens.len()),
            tokens: FxHashMap::default(),
        };
        for token in tokens {
            arena.order.push(token.id);
            arena.tokens.insert(token.id, token.clone());
        }
        arena
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.tokens.contains_key(&id)
    }

    /// Literal text of the token, if the id is known.
    pub fn value(&self, id: TokenId) -> Option<&str> {
        self.get(id).map(|t| t.value.as_str())
    }

    /// Values for a run of ids, skipping unknown ids.
    pub fn values(&self, ids: &[TokenId]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.value(*id))
            .map(str::to_string)
            .collect()
    }

    /// Tokens in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.order.iter().filter_map(|id| self.tokens.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<Token>> for TokenArena {
    fn from(tokens: Vec<Token>) -> Self {
        let order = tokens.iter().map(|t| t.id).collect();
        let tokens = tokens.into_iter().map(|t| (t.id, t)).collect();
        TokenArena { order, tokens }
    }
}

/// Serialized as the token list in processing order.
impl Serialize for TokenArena {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::operators::Operator;

    #[test]
    fn test_lookup_by_id() {
        let tokens = vec![
            Token::operand(TokenId(10), "1"),
            Token::operator(TokenId(11), Operator::Add),
            Token::operand(TokenId(12), "2"),
        ];
        let arena = TokenArena::new(&tokens);

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.value(TokenId(11)), Some("+"));
        assert!(!arena.contains(TokenId(0)));
        assert_eq!(
            arena.values(&[TokenId(12), TokenId(99), TokenId(10)]),
            vec!["2".to_string(), "1".to_string()]
        );
        let order: Vec<_> = arena.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![TokenId(10), TokenId(11), TokenId(12)]);
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let json = r#"[
            {"id": 7, "value": ")", "kind": "right_paren"},
            {"id": 3, "value": "4", "kind": "operand"}
        ]"#;
        let arena: TokenArena = serde_json::from_str(json).unwrap();

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.value(TokenId(3)), Some("4"));
        let order: Vec<_> = arena.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![TokenId(7), TokenId(3)]);
    }
}
