// Step engine for the Shunting Yard algorithm

use crate::interpreter::errors::StructureError;
use crate::parser::ids::TokenId;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::operators::{should_pop_before_push, Operator};
use crate::snapshot::{Container, Notation, Step};
use std::ops::ControlFlow;

/// Transition metadata attached to a recorded step
#[derive(Debug, Default)]
struct Transition {
    moved: Option<TokenId>,
    from: Option<Container>,
    to: Option<Container>,
    popped: Option<Vec<TokenId>>,
    error: Option<StructureError>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn single(token: &Token, from: Container, to: Container) -> Self {
        Transition {
            moved: Some(token.id),
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Highlight a token without recording a container move.
    fn highlight(token: &Token) -> Self {
        Transition {
            moved: Some(token.id),
            ..Self::default()
        }
    }

    fn batch(popped: &[&Token]) -> Self {
        Transition {
            moved: popped.last().map(|t| t.id),
            from: Some(Container::Stack),
            to: Some(Container::Output),
            popped: Some(popped.iter().map(|t| t.id).collect()),
            error: None,
        }
    }

    fn error(token: &Token, error: StructureError) -> Self {
        Transition {
            moved: Some(token.id),
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Runs the Shunting Yard algorithm over a token sequence, recording a
/// [`Step`] after every micro-operation.
///
/// The engine always walks its input left to right; prefix conversion feeds
/// it a reversed, paren-swapped sequence (see [`super::prefix`]).
pub struct StepEngine<'a> {
    tokens: &'a [Token],
    notation: Notation,

    /// Index of the first input token not yet consumed
    cursor: usize,

    /// Operator stack (bottom to top)
    stack: Vec<&'a Token>,

    /// Output sequence in emission order
    output: Vec<&'a Token>,

    steps: Vec<Step>,
}

impl<'a> StepEngine<'a> {
    pub fn new(tokens: &'a [Token], notation: Notation) -> Self {
        StepEngine {
            tokens,
            notation,
            cursor: 0,
            stack: Vec::new(),
            output: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Consume every token and return the full step history.
    ///
    /// A structural error ends the history at its error step; otherwise the
    /// last step is the terminal step with `is_done` set.
    pub fn run(mut self) -> Vec<Step> {
        self.record(self.notation.start_description(), Transition::none());

        let tokens = self.tokens;
        for token in tokens {
            let flow = match token.kind {
                TokenKind::Operand => {
                    self.on_operand(token);
                    ControlFlow::Continue(())
                }
                TokenKind::Operator(op) => {
                    self.on_operator(token, op);
                    ControlFlow::Continue(())
                }
                TokenKind::LeftParen => {
                    self.on_left_paren(token);
                    ControlFlow::Continue(())
                }
                TokenKind::RightParen => self.on_right_paren(token),
            };

            if flow.is_break() {
                return self.steps;
            }
        }

        if self.drain().is_break() {
            return self.steps;
        }

        self.finish();
        self.steps
    }

    fn on_operand(&mut self, token: &'a Token) {
        self.consume();
        self.output.push(token);
        self.record(
            format!("Token '{}' is an operand. Move to output.", token.value),
            Transition::single(token, Container::Stream, Container::Output),
        );
    }

    fn on_operator(&mut self, token: &'a Token, incoming: Operator) {
        let mut popped = Vec::new();
        while let Some(&top) = self.stack.last() {
            match top.as_operator() {
                Some(op) if should_pop_before_push(op, incoming) => {
                    self.stack.pop();
                    self.output.push(top);
                    popped.push(top);
                }
                _ => break,
            }
        }

        if !popped.is_empty() {
            self.record(
                format!(
                    "Popped operator(s) {} from stack to output: they take precedence over '{}'.",
                    quoted(&popped),
                    token.value
                ),
                Transition::batch(&popped),
            );
        }

        self.consume();
        self.stack.push(token);
        self.record(
            format!("Token '{}' is an operator. Push to stack.", token.value),
            Transition::single(token, Container::Stream, Container::Stack),
        );
    }

    fn on_left_paren(&mut self, token: &'a Token) {
        self.consume();
        self.stack.push(token);
        self.record(
            "Token '(' is a left parenthesis. Push to stack.",
            Transition::single(token, Container::Stream, Container::Stack),
        );
    }

    fn on_right_paren(&mut self, token: &'a Token) -> ControlFlow<()> {
        let mut popped = Vec::new();
        while let Some(&top) = self.stack.last() {
            if top.kind == TokenKind::LeftParen {
                break;
            }
            self.stack.pop();
            self.output.push(top);
            popped.push(top);
        }

        if !popped.is_empty() {
            self.record(
                "Token ')' found. Pop operators from stack to output until '(' is found.",
                Transition::batch(&popped),
            );
        }

        self.consume();
        match self.stack.last() {
            Some(&open) if open.kind == TokenKind::LeftParen => {
                self.stack.pop();
                self.record(
                    "Found '('. Discard both parentheses.",
                    Transition::highlight(open),
                );
                ControlFlow::Continue(())
            }
            _ => {
                let error = StructureError::UnmatchedRightParen { token: token.id };
                tracing::warn!(%error, "unbalanced expression");
                self.record(
                    "Error: Mismatched parentheses. ')' found without a matching '('.",
                    Transition::error(token, error),
                );
                ControlFlow::Break(())
            }
        }
    }

    /// Pop everything left on the stack once the input is exhausted.
    fn drain(&mut self) -> ControlFlow<()> {
        let mut popped = Vec::new();
        let mut unclosed = None;
        while let Some(&top) = self.stack.last() {
            if top.is_paren() {
                unclosed = Some(top);
                break;
            }
            self.stack.pop();
            self.output.push(top);
            popped.push(top);
        }

        if !popped.is_empty() {
            self.record(
                "End of stream. Pop remaining operators from stack to output.",
                Transition::batch(&popped),
            );
        }

        match unclosed {
            Some(paren) => {
                let error = StructureError::UnmatchedLeftParen { token: paren.id };
                tracing::warn!(%error, "unbalanced expression");
                self.record(
                    "Error: Mismatched parentheses. '(' was never closed.",
                    Transition::error(paren, error),
                );
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        }
    }

    /// Repeat the final container state as the terminal step.
    fn finish(&mut self) {
        let values: Vec<&str> = self.output.iter().map(|t| t.value.as_str()).collect();
        let description = finished_description(self.notation, &values);
        let mut terminal = self.snapshot(description, Transition::none());
        terminal.is_done = true;
        self.push(terminal);
    }

    fn consume(&mut self) {
        self.cursor += 1;
    }

    fn record(&mut self, description: impl Into<String>, transition: Transition) {
        let step = self.snapshot(description.into(), transition);
        self.push(step);
    }

    fn snapshot(&self, description: String, transition: Transition) -> Step {
        Step {
            index: self.steps.len(),
            description,
            stream_ids: self.tokens[self.cursor..].iter().map(|t| t.id).collect(),
            stack_ids: self.stack.iter().map(|t| t.id).collect(),
            output_ids: self.output.iter().map(|t| t.id).collect(),
            moved_token_id: transition.moved,
            from: transition.from,
            to: transition.to,
            popped_token_ids: transition.popped,
            is_done: transition.error.is_some(),
            error: transition.error,
        }
    }

    fn push(&mut self, step: Step) {
        tracing::debug!(step = step.index, description = %step.description, "step recorded");
        self.steps.push(step);
    }
}

/// Description of the terminal step; `values` must already be in final order.
pub fn finished_description(notation: Notation, values: &[&str]) -> String {
    format!(
        "Algorithm finished. Final {} expression: {}",
        notation.label(),
        values.join(" ")
    )
}

fn quoted(tokens: &[&Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
