//! # Introduction
//!
//! yardtrace converts infix expressions to postfix or prefix form with the
//! Shunting Yard algorithm, recording a snapshot of the algorithm's state
//! after every micro-operation. The resulting trace can be replayed forward
//! and backward by a visualizer without re-running anything.
//!
//! ## Conversion pipeline
//!
//! ```text
//! Source → Lexer → (Prefix adapter) → Step engine → Trace → Session / Narrator
//! ```
//!
//! 1. [`parser`]: tokenises the source into operands, operators and
//!    parentheses, each with a stable [`parser::ids::TokenId`].
//! 2. [`interpreter`]: runs the step engine and captures
//!    [`snapshot::Step`]s; prefix conversion goes through
//!    [`interpreter::prefix`].
//! 3. [`memory`]: the [`memory::TokenArena`] that resolves step ids back to
//!    tokens.
//! 4. [`snapshot`]: the immutable [`snapshot::Trace`] and its outcome.
//! 5. [`narration`]: seam for an external narrator, with a fixed fallback.
//!
//! ## Example
//!
//! ```
//! use yardtrace::{convert, Notation};
//!
//! let trace = convert("3+4*2", Notation::Postfix).unwrap();
//! assert_eq!(trace.final_expression().as_deref(), Some("3 4 2 * +"));
//! assert!(trace.last().unwrap().is_done);
//! ```
//!
//! ## Supported syntax
//!
//! Numeric literals, the binary operators `+ - * / ^`, and parentheses.
//! No functions, unary operators or identifiers; values are never computed.

pub mod interpreter;
pub mod memory;
pub mod narration;
pub mod parser;
pub mod snapshot;

pub use interpreter::errors::{ReplayError, StructureError};
pub use interpreter::session::{Session, SessionConfig};
pub use interpreter::{convert, convert_with, trace_tokens};
pub use parser::lexer::{Token, TokenKind, TokenizationError};
pub use snapshot::{Container, Notation, Outcome, Step, Trace};
