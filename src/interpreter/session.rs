// Replay session: expression, notation and a cursor into the current trace

use super::errors::ReplayError;
use super::trace_tokens;
use crate::narration::{narrate_or_fallback, NarrationContext, Narrator};
use crate::parser::ids::AtomicIds;
use crate::parser::lexer::{tokenize, Token, TokenizationError};
use crate::snapshot::{Notation, Step, Trace};
use serde::{Deserialize, Serialize};

/// Expression shown when a session starts
pub const DEFAULT_EXPRESSION: &str = "(7+4)-2*(6-7)";

/// Session startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionConfig {
    pub default_expression: String,
    pub notation: Notation,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_expression: DEFAULT_EXPRESSION.to_string(),
            notation: Notation::Postfix,
        }
    }
}

/// Navigates the step history of one expression.
///
/// Stepping never re-runs the engine; only [`Session::load`] and
/// [`Session::set_notation`] regenerate the trace.
#[derive(Debug)]
pub struct Session {
    expression: String,
    notation: Notation,

    /// Tokens in original order (before any prefix reversal)
    tokens: Vec<Token>,

    trace: Trace,

    /// Index of the current step (always within the trace)
    position: usize,

    ids: AtomicIds,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, TokenizationError> {
        let ids = AtomicIds::new();
        let tokens = tokenize(&config.default_expression, &ids)?;
        let trace = trace_tokens(&tokens, config.notation);

        Ok(Session {
            expression: config.default_expression,
            notation: config.notation,
            tokens,
            trace,
            position: 0,
            ids,
        })
    }

    /// Replace the expression and rewind to the first step.
    ///
    /// On a tokenization failure the previous expression, trace and position
    /// are kept.
    pub fn load(&mut self, expression: &str) -> Result<(), TokenizationError> {
        let tokens = tokenize(expression, &self.ids).inspect_err(|error| {
            tracing::warn!(%error, expression, "rejected expression");
        })?;

        self.trace = trace_tokens(&tokens, self.notation);
        self.tokens = tokens;
        self.expression = expression.to_string();
        self.position = 0;
        Ok(())
    }

    /// Switch notation, regenerating the trace for the current expression.
    pub fn set_notation(&mut self, notation: Notation) {
        self.notation = notation;
        self.trace = trace_tokens(&self.tokens, notation);
        self.position = 0;
    }

    pub fn step_forward(&mut self) -> Result<&Step, ReplayError> {
        if self.is_last_step() {
            return Err(ReplayError::AtEnd);
        }
        self.position += 1;
        Ok(self.current_step())
    }

    pub fn step_backward(&mut self) -> Result<&Step, ReplayError> {
        if self.is_first_step() {
            return Err(ReplayError::AtStart);
        }
        self.position -= 1;
        Ok(self.current_step())
    }

    /// Rewind to the ready step.
    pub fn reset(&mut self) -> &Step {
        self.position = 0;
        self.current_step()
    }

    /// Jump straight to step `index`.
    pub fn seek(&mut self, index: usize) -> Result<&Step, ReplayError> {
        if index >= self.trace.len() {
            return Err(ReplayError::OutOfRange {
                index,
                len: self.trace.len(),
            });
        }
        self.position = index;
        Ok(self.current_step())
    }

    pub fn current_step(&self) -> &Step {
        &self.trace.steps()[self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_steps(&self) -> usize {
        self.trace.len()
    }

    pub fn is_first_step(&self) -> bool {
        self.position == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.position + 1 >= self.trace.len()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Tokens in original order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Narration context for the current step.
    pub fn narration_context(&self) -> NarrationContext {
        NarrationContext::from_step(&self.trace, self.current_step())
    }

    /// Narrate the current step, falling back to a fixed message on failure.
    pub fn narrate(&self, narrator: &dyn Narrator) -> String {
        narrate_or_fallback(narrator, &self.narration_context())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::{NarrationError, FALLBACK_NARRATION};

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_default_session() {
        let s = session();
        assert_eq!(s.expression(), DEFAULT_EXPRESSION);
        assert_eq!(s.notation(), Notation::Postfix);
        assert!(s.is_first_step());
        assert_eq!(s.tokens().len(), 13);
        assert_eq!(
            s.trace().final_expression().as_deref(),
            Some("7 4 + 2 6 7 - * -")
        );
    }

    #[test]
    fn test_step_forward_and_back() {
        let mut s = session();
        assert_eq!(s.step_backward().unwrap_err(), ReplayError::AtStart);

        let first = s.step_forward().unwrap().index;
        assert_eq!(first, 1);
        let back = s.step_backward().unwrap().index;
        assert_eq!(back, 0);
    }

    #[test]
    fn test_forward_stops_at_end() {
        let mut s = session();
        while s.step_forward().is_ok() {}
        assert!(s.is_last_step());
        assert_eq!(s.position(), s.total_steps() - 1);
        assert!(s.current_step().is_done);
        assert_eq!(s.step_forward().unwrap_err(), ReplayError::AtEnd);
    }

    #[test]
    fn test_seek_and_reset() {
        let mut s = session();
        assert_eq!(s.seek(3).unwrap().index, 3);
        let total = s.total_steps();
        assert_eq!(
            s.seek(total).unwrap_err(),
            ReplayError::OutOfRange { index: total, len: total }
        );
        assert_eq!(s.position(), 3);
        assert_eq!(s.reset().index, 0);
    }

    #[test]
    fn test_load_rewinds() {
        let mut s = session();
        s.seek(2).unwrap();
        s.load("2^3^2").unwrap();
        assert_eq!(s.position(), 0);
        assert_eq!(s.expression(), "2^3^2");
        assert_eq!(s.trace().final_expression().as_deref(), Some("2 3 2 ^ ^"));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut s = session();
        s.seek(4).unwrap();
        let err = s.load("2 + a").unwrap_err();
        assert_eq!(err.found, 'a');
        assert_eq!(s.expression(), DEFAULT_EXPRESSION);
        assert_eq!(s.position(), 4);
    }

    #[test]
    fn test_set_notation_regenerates() {
        let mut s = session();
        s.seek(5).unwrap();
        s.set_notation(Notation::Prefix);
        assert_eq!(s.position(), 0);
        assert_eq!(s.trace().notation(), Notation::Prefix);
        assert_eq!(
            s.trace().final_expression().as_deref(),
            Some("- + 7 4 * 2 - 6 7")
        );
    }

    #[test]
    fn test_ids_stay_unique_across_loads() {
        let mut s = session();
        let before: Vec<_> = s.tokens().iter().map(|t| t.id).collect();
        s.load("1+2").unwrap();
        assert!(s.tokens().iter().all(|t| !before.contains(&t.id)));
    }

    #[test]
    fn test_narrate_current_step() {
        let mut s = session();
        s.step_forward().unwrap();

        let echo = |ctx: &NarrationContext| -> Result<String, NarrationError> {
            Ok(format!("next up: {}", ctx.token))
        };
        assert_eq!(s.narrate(&echo), "next up: 7");

        let failing = |_: &NarrationContext| -> Result<String, NarrationError> {
            Err(NarrationError::Unavailable("offline".into()))
        };
        assert_eq!(s.narrate(&failing), FALLBACK_NARRATION);
    }

    #[test]
    fn test_narration_context_tracks_position() {
        let mut s = session();
        s.seek(3).unwrap();

        let ctx = s.narration_context();
        assert_eq!(ctx, NarrationContext::for_step(s.trace(), 3).unwrap());
        assert_eq!(ctx.stack, vec!["(", "+"]);
        assert_eq!(ctx.output_queue, vec!["7"]);
        assert_eq!(ctx.explanation_so_far.split("; ").count(), 4);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"notation":"prefix"}"#).unwrap();
        assert_eq!(config.default_expression, DEFAULT_EXPRESSION);
        assert_eq!(config.notation, Notation::Prefix);
    }
}
