//! Script format types and operations.
//!
//! This module contains the data model for Paradox script files (statements,
//! values and scripts) together with the tokenizer, parser and writer that
//! move them to and from text.

mod document;
pub mod escape;
mod operator;
mod parser;
mod statement;
mod tokenizer;
mod writer;

pub use document::Script;
pub use escape::{is_quoted, needs_quoting, quote, to_scalar_word, unquote};
pub use operator::Operator;
pub use parser::ScriptParser;
pub use statement::{Shape, Statement, Value};
pub use tokenizer::{Token, Tokenizer};
pub use writer::ScriptWriter;
