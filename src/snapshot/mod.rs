// Step snapshots for trace replay

use crate::interpreter::errors::StructureError;
use crate::memory::TokenArena;
use crate::parser::ids::TokenId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    #[default]
    Postfix,
    Prefix,
}

impl Notation {
    pub fn label(self) -> &'static str {
        match self {
            Notation::Postfix => "postfix",
            Notation::Prefix => "prefix",
        }
    }

    /// Description of the ready step (step 0)
    pub fn start_description(self) -> &'static str {
        match self {
            Notation::Postfix => "Start of algorithm. Tokens are ready to be processed.",
            Notation::Prefix => "Start of algorithm (for prefix). Expression is reversed.",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three logical containers a token can sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    Stream,
    Stack,
    Output,
}

/// Snapshot of engine state after one micro-operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(rename = "step")]
    pub index: usize,
    pub description: String,
    /// Input tokens not yet consumed, in input order.
    pub stream_ids: Vec<TokenId>,
    /// Operator stack, bottom to top.
    pub stack_ids: Vec<TokenId>,
    /// Output in emission order.
    pub output_ids: Vec<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_token_id: Option<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Container>,
    /// Tokens popped as one batch, in pop order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popped_token_ids: Option<Vec<TokenId>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StructureError>,
}

impl Step {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_batch(&self) -> bool {
        self.popped_token_ids.is_some()
    }

    /// All ids referenced by the container views.
    pub fn container_ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.stream_ids
            .iter()
            .chain(&self.stack_ids)
            .chain(&self.output_ids)
            .copied()
    }
}

/// How a trace ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Terminal output ids, already in final left-to-right order.
    Converted { output: Vec<TokenId> },
    /// Processing stopped at an error step.
    ///
    /// Prefix traces run on the reversed, paren-swapped input, so an unclosed
    /// `(` from the source is reported as an unmatched `)` naming the same
    /// token id.
    Mismatched(StructureError),
}

/// Complete, immutable step history for one expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    notation: Notation,
    tokens: TokenArena,
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn new(notation: Notation, tokens: TokenArena, steps: Vec<Step>) -> Self {
        Trace {
            notation,
            tokens,
            steps,
        }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Tokens as the engine saw them (reversed and paren-swapped for prefix).
    pub fn tokens(&self) -> &TokenArena {
        &self.tokens
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn outcome(&self) -> Outcome {
        match self.steps.last() {
            Some(Step {
                error: Some(error), ..
            }) => Outcome::Mismatched(*error),
            Some(step) => Outcome::Converted {
                output: step.output_ids.clone(),
            },
            None => Outcome::Converted { output: Vec::new() },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome(), Outcome::Converted { .. })
    }

    /// Values of the given ids, in the given order.
    pub fn values(&self, ids: &[TokenId]) -> Vec<String> {
        self.tokens.values(ids)
    }

    /// Space-joined converted expression, or `None` when the trace ended in error.
    pub fn final_expression(&self) -> Option<String> {
        match self.outcome() {
            Outcome::Converted { output } => Some(self.values(&output).join(" ")),
            Outcome::Mismatched(_) => None,
        }
    }
}
