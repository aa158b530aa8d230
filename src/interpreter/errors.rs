//! Error types for the step engine and trace replay
//!
//! [`StructureError`] is never raised: the engine records it on the error
//! step that ends a trace. [`ReplayError`] is returned by
//! [`Session`](super::session::Session) navigation.

use crate::parser::ids::TokenId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unbalanced parentheses detected while generating steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureError {
    /// `)` reached with no `(` left on the stack
    #[error("Mismatched parentheses: ')' ({token}) found without a matching '('")]
    UnmatchedRightParen { token: TokenId },

    /// `(` still on the stack when the input ran out
    #[error("Mismatched parentheses: '(' ({token}) is never closed")]
    UnmatchedLeftParen { token: TokenId },
}

impl StructureError {
    /// The parenthesis token that could not be matched.
    pub fn token(&self) -> TokenId {
        match self {
            StructureError::UnmatchedRightParen { token }
            | StructureError::UnmatchedLeftParen { token } => *token,
        }
    }
}

/// Navigation past the ends of a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("Already at the first step")]
    AtStart,

    #[error("Already at the last step")]
    AtEnd,

    #[error("Step {index} out of range (trace has {len} steps)")]
    OutOfRange { index: usize, len: usize },
}
