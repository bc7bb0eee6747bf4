//! # pdx-script
//!
//! Parser and writer for the script files of Paradox Interactive games
//! (Hearts of Iron IV, Europa Universalis IV, Stellaris and friends).
//!
//! Scripts are nested `keyword operator value` statements:
//!
//! ```text
//! focus = {
//!     id = FIN_war_plans
//!     available = { has_war = yes num_of_factories > 10 }
//!     color = { 12 40 200 }
//! }
//! ```
//!
//! This library reads such text into an editable tree, writes the tree back
//! in a canonical layout that reads back into the same tree, and converts
//! trees to and from JSON.
//!
//! ## Features
//!
//! - **Line-based tokenizer**: quoted words, backslash escapes and `#`
//!   comments
//! - **Iterative parser**: an explicit stack keeps deeply nested input off
//!   the call stack, with a configurable depth limit
//! - **Editable tree**: positional and keyword-based access, insertion and
//!   removal
//! - **Round-trip writer**: `parse(write(script)) == script`
//! - **File helpers**: byte order mark handling and protection of the game
//!   install against accidental writes
//! - **Thread-safe**: All public types implement `Send + Sync`
//!
//! ## Quick Start
//!
//! ### Parsing
//!
//! ```rust
//! use pdx_script::{ScriptParser, Value};
//!
//! let parser = ScriptParser::new();
//! let script = parser.parse("available = { has_war = yes num_of_factories > 10 }")?;
//!
//! let available = script.find("available").unwrap();
//! let children = available.value().as_block().unwrap();
//! assert_eq!(children.len(), 2);
//! assert_eq!(children[1].value(), &Value::scalar("10"));
//! # Ok::<(), pdx_script::ScriptError>(())
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use pdx_script::{Script, ScriptWriter, Statement};
//!
//! let mut script = Script::new();
//! script.push(Statement::scalar("tag", "FIN"));
//! script.push(Statement::list("color", ["12", "40", "200"]));
//!
//! let lines = ScriptWriter::new().write_body(&script);
//! assert_eq!(lines, ["tag = FIN", "color = {", "\t12 40 200", "}"]);
//! ```
//!
//! ### Configuration
//!
//! ```rust
//! use pdx_script::{ParserConfig, ScriptParser, ScriptWriter, WriterConfig};
//!
//! let parser = ScriptParser::with_config(ParserConfig::new().with_max_depth(64));
//! let writer = ScriptWriter::with_config(WriterConfig::new().with_indent("    "));
//! # let _ = (parser, writer);
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use pdx_script::{ScriptError, ScriptParser};
//!
//! match ScriptParser::new().parse("a = { b = c") {
//!     Ok(_) => unreachable!(),
//!     Err(ScriptError::UnclosedBlock { position, message }) => {
//!         eprintln!("Unclosed block at token {}: {}", position, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ### Files
//!
//! ```rust,no_run
//! use pdx_script::{read_script, write_script, ScriptConfig, Statement};
//!
//! let config = ScriptConfig::default();
//! let mut script = read_script("common/ideas/FIN.txt", &config)?;
//! script.push(Statement::scalar("added", "yes"));
//! write_script("common/ideas/FIN.txt", &script, &config)?;
//! # Ok::<(), pdx_script::ScriptError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod script;

// Re-exports for convenience
pub use script::escape;
pub use script::{
    Operator, Script, ScriptParser, ScriptWriter, Shape, Statement, Token, Tokenizer, Value,
};
pub use config::{IoConfig, ParserConfig, ScriptConfig, WriterConfig};
pub use convert::{from_json, parse_json, to_json, to_json_string};
pub use error::{Result, ScriptError};
pub use io::{read_script, render_script, write_script, PathGuard};

/// Thread safety verification module.
///
/// Compile-time assertions that every public type implements `Send` and
/// `Sync`. Parsers and writers hold only their configuration, so one
/// instance can serve many threads; scripts are plain owned trees.
#[cfg(test)]
mod thread_safety {
    use super::*;

    /// Compile-time assertion that a type is Send + Sync.
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn model_types_are_send_sync() {
        assert_send_sync::<Script>();
        assert_send_sync::<Statement>();
        assert_send_sync::<Value>();
        assert_send_sync::<Shape>();
        assert_send_sync::<Operator>();
    }

    #[test]
    fn processing_types_are_send_sync() {
        assert_send_sync::<ScriptParser>();
        assert_send_sync::<ScriptWriter>();
        assert_send_sync::<Token>();
        assert_send_sync::<Tokenizer>();
        assert_send_sync::<PathGuard>();
    }

    #[test]
    fn config_and_error_types_are_send_sync() {
        assert_send_sync::<ParserConfig>();
        assert_send_sync::<WriterConfig>();
        assert_send_sync::<IoConfig>();
        assert_send_sync::<ScriptConfig>();
        assert_send_sync::<ScriptError>();
    }

    #[test]
    fn parser_can_be_shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let parser = Arc::new(ScriptParser::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = Arc::clone(&parser);
                thread::spawn(move || parser.parse(&format!("value = {}", i)))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let script = handle.join().unwrap().unwrap();
            assert_eq!(script[0].value(), &Value::scalar(i.to_string()));
        }
    }
}
