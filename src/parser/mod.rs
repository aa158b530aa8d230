//! Infix expression tokenizer
//!
//! This module turns expression text into classified tokens:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`operators`]: Operator precedence/associativity table and the pop predicate
//! - [`ids`]: Token identity sources
//!
//! # Supported Syntax
//!
//! - Operands: unsigned numeric literals (`12`, `3.5`, `7.`)
//! - Operators: `+ - * / ^` (all binary)
//! - Grouping: `(` and `)`
//! - No identifiers, functions, or unary operators
//!
//! # Lexer Implementation
//!
//! Hand-written single-pass scanner. No regex or lexer generator dependencies.

pub mod ids;
pub mod lexer;
pub mod operators;
