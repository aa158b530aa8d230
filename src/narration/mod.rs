//! Narration collaborator seam
//!
//! A [`Narrator`] turns the state of one step into free-form prose, usually by
//! calling out to an external model. Narration runs after the trace exists and
//! can only ever affect the text it returns: failures collapse into
//! [`FALLBACK_NARRATION`].

use crate::snapshot::{Step, Trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown in place of narration when the narrator fails.
pub const FALLBACK_NARRATION: &str = "Sorry, I couldn't generate an explanation right now.";

/// Placeholder token when no following step moves a token.
pub const NO_TOKEN: &str = "N/A";

/// Everything a narrator is told about one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationContext {
    pub step_description: String,
    /// Value of the token the next step moves, or [`NO_TOKEN`].
    pub token: String,
    pub stack: Vec<String>,
    pub output_queue: Vec<String>,
    /// Descriptions of every step up to and including this one, `"; "`-joined.
    pub explanation_so_far: String,
}

impl NarrationContext {
    /// Build the context for step `index` of `trace`.
    pub fn for_step(trace: &Trace, index: usize) -> Option<Self> {
        trace.get(index).map(|step| Self::from_step(trace, step))
    }

    /// Build the context for a step known to belong to `trace`.
    pub(crate) fn from_step(trace: &Trace, step: &Step) -> Self {
        let token = trace
            .get(step.index + 1)
            .and_then(|next| next.moved_token_id)
            .and_then(|id| trace.tokens().value(id))
            .unwrap_or(NO_TOKEN)
            .to_string();

        NarrationContext {
            step_description: step.description.clone(),
            token,
            stack: trace.values(&step.stack_ids),
            output_queue: trace.values(&step.output_ids),
            explanation_so_far: trace
                .steps()
                .iter()
                .take(step.index + 1)
                .map(|s| s.description.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Narrator failures
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Narration service unavailable: {0}")]
    Unavailable(String),

    #[error("Narration service returned no text")]
    Empty,
}

/// Produces explanatory prose for a step.
pub trait Narrator {
    fn narrate(&self, context: &NarrationContext) -> Result<String, NarrationError>;
}

impl<F> Narrator for F
where
    F: Fn(&NarrationContext) -> Result<String, NarrationError>,
{
    fn narrate(&self, context: &NarrationContext) -> Result<String, NarrationError> {
        self(context)
    }
}

/// Ask `narrator` for prose, substituting [`FALLBACK_NARRATION`] on failure.
pub fn narrate_or_fallback(narrator: &dyn Narrator, context: &NarrationContext) -> String {
    let result = narrator.narrate(context).and_then(|text| {
        if text.trim().is_empty() {
            Err(NarrationError::Empty)
        } else {
            Ok(text)
        }
    });

    match result {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(%error, step = %context.step_description, "narration failed");
            FALLBACK_NARRATION.to_string()
        }
    }
}
