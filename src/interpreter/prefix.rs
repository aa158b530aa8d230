//! Prefix conversion on top of the postfix engine
//!
//! Reversing the input and swapping the roles of `(` and `)` lets the same
//! left-to-right [`StepEngine`] produce the prefix form; only the terminal
//! step's output is then reversed into reading order. Intermediate steps keep
//! the engine's native order since they show live algorithm state.

use super::engine::{finished_description, StepEngine};
use crate::memory::TokenArena;
use crate::parser::lexer::{Token, TokenKind};
use crate::snapshot::{Notation, Step, Trace};

/// Reverse `tokens`, reclassifying each parenthesis as its mirror image.
///
/// Ids are preserved so every occurrence stays addressable across modes.
pub fn reverse_for_prefix(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .rev()
        .map(|token| match token.kind {
            TokenKind::LeftParen => Token::right_paren(token.id),
            TokenKind::RightParen => Token::left_paren(token.id),
            TokenKind::Operand | TokenKind::Operator(_) => token.clone(),
        })
        .collect()
}

/// Build the prefix trace for `tokens` given in original (left-to-right) order.
pub fn trace_prefix(tokens: &[Token]) -> Trace {
    let reversed = reverse_for_prefix(tokens);
    let mut steps = StepEngine::new(&reversed, Notation::Prefix).run();
    let arena = TokenArena::new(&reversed);
    normalize_terminal(&mut steps, &arena);
    Trace::new(Notation::Prefix, arena, steps)
}

/// Rewrite the terminal step in place so its output reads in prefix order.
///
/// Traces that end in an error step have no terminal step and are left as is.
fn normalize_terminal(steps: &mut [Step], arena: &TokenArena) {
    let Some(terminal) = steps.last_mut().filter(|s| s.is_done && !s.is_error()) else {
        return;
    };

    terminal.output_ids.reverse();
    let values: Vec<&str> = terminal
        .output_ids
        .iter()
        .filter_map(|id| arena.value(*id))
        .collect();
    terminal.description = finished_description(Notation::Prefix, &values);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::StructureError;
    use crate::parser::ids::{SequentialIds, TokenId};
    use crate::parser::lexer::tokenize;
    use crate::snapshot::Outcome;
    use pretty_assertions::assert_eq;

    fn prefix(expression: &str) -> Trace {
        let tokens = tokenize(expression, &SequentialIds::new()).unwrap();
        trace_prefix(&tokens)
    }

    #[test]
    fn test_reverse_swaps_parens_and_keeps_ids() {
        let tokens = tokenize("(1+2)", &SequentialIds::new()).unwrap();
        let reversed = reverse_for_prefix(&tokens);

        let values: Vec<&str> = reversed.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["(", "2", "+", "1", ")"]);
        assert_eq!(reversed[0].id, TokenId(4));
        assert_eq!(reversed[0].kind, TokenKind::LeftParen);
        assert_eq!(reversed[4].id, TokenId(0));
        assert_eq!(reversed[4].kind, TokenKind::RightParen);
    }

    #[test]
    fn test_grouped_expression() {
        let trace = prefix("(7+4)-2*(6-7)");
        assert_eq!(
            trace.final_expression().as_deref(),
            Some("- + 7 4 * 2 - 6 7")
        );
        assert_eq!(
            trace.last().unwrap().description,
            "Algorithm finished. Final prefix expression: - + 7 4 * 2 - 6 7"
        );
        assert_eq!(
            trace.steps()[0].description,
            "Start of algorithm (for prefix). Expression is reversed."
        );
    }

    #[test]
    fn test_only_terminal_output_is_reversed() {
        let trace = prefix("1-2");
        let steps = trace.steps();
        let last = &steps[steps.len() - 1];
        let before = &steps[steps.len() - 2];

        // Engine order is 2 1 -, terminal reads - 1 2
        assert_eq!(trace.values(&before.output_ids), vec!["2", "1", "-"]);
        assert_eq!(trace.values(&last.output_ids), vec!["-", "1", "2"]);
    }

    #[test]
    fn test_stream_follows_reversed_order() {
        let trace = prefix("1+2");
        assert_eq!(
            trace.steps()[0].stream_ids,
            vec![TokenId(2), TokenId(1), TokenId(0)]
        );
    }

    #[test]
    fn test_unbalanced_prefix_keeps_error_step() {
        // Reversed, the unmatched '(' shows up as an unmatched ')'
        let trace = prefix("(1+2");
        assert_eq!(
            trace.outcome(),
            Outcome::Mismatched(StructureError::UnmatchedRightParen { token: TokenId(0) })
        );
        assert!(trace.final_expression().is_none());
    }
}
