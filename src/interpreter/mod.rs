//! Shunting Yard step engine
//!
//! This module provides the conversion pipeline:
//! - [`engine`]: The step-recording state machine
//! - [`prefix`]: Reverse/paren-swap adapter for prefix conversion
//! - [`errors`]: Structural and replay error types
//! - [`session`]: Replay cursor over a generated trace
//!
//! # Execution Model
//!
//! The whole trace is produced eagerly in one pass. Every micro-operation
//! (operand move, operator push, batch pop, paren discard) appends an
//! immutable [`Step`](crate::snapshot::Step); replaying the trace afterwards is
//! pure indexing.

pub mod engine;
pub mod errors;
pub mod prefix;
pub mod session;

use crate::memory::TokenArena;
use crate::parser::ids::{IdSource, SequentialIds};
use crate::parser::lexer::{tokenize, Token, TokenizationError};
use crate::snapshot::{Notation, Trace};
use engine::StepEngine;

/// Trace an already tokenized expression given in original order.
pub fn trace_tokens(tokens: &[Token], notation: Notation) -> Trace {
    match notation {
        Notation::Postfix => {
            let steps = StepEngine::new(tokens, notation).run();
            Trace::new(notation, TokenArena::new(tokens), steps)
        }
        Notation::Prefix => prefix::trace_prefix(tokens),
    }
}

/// Tokenize `expression` with ids from `ids` and trace its conversion.
///
/// Unbalanced parentheses are not an error here; they end the trace with an
/// error step (see [`Trace::outcome`]).
pub fn convert_with(
    expression: &str,
    notation: Notation,
    ids: &dyn IdSource,
) -> Result<Trace, TokenizationError> {
    let tokens = tokenize(expression, ids)?;
    tracing::debug!(expression, %notation, tokens = tokens.len(), "tracing conversion");
    Ok(trace_tokens(&tokens, notation))
}

/// Like [`convert_with`], with a fresh id counter starting at zero.
pub fn convert(expression: &str, notation: Notation) -> Result<Trace, TokenizationError> {
    convert_with(expression, notation, &SequentialIds::new())
}
