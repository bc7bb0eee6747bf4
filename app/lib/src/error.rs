//! Error types for the pdx-script library.
//!
//! This module defines all error types that can occur while building,
//! parsing, converting and persisting scripts.

use thiserror::Error;

/// Main error type for the pdx-script library.
///
/// All operations that can fail return `Result<T, ScriptError>`.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Block markers are not balanced.
    ///
    /// Raised when a script opens more blocks than it closes, or closes a
    /// block that was never opened. The partially built tree is discarded.
    #[error("Unclosed block at token {position}: {message}")]
    UnclosedBlock {
        /// Index of the offending token (or the token count at end of input)
        position: usize,
        /// Description of the imbalance
        message: String,
    },

    /// Token sequence does not form a statement.
    ///
    /// Covers operators without a keyword, blocks without a keyword, values
    /// that never arrive and bare words left over at the top level.
    #[error("Syntax error at token {position}: {message}")]
    Syntax {
        /// Index of the offending token
        position: usize,
        /// Description of the syntax error
        message: String,
    },

    /// A block contains both child statements and bare scalar words.
    #[error("Block '{keyword}' closed at token {position} mixes statements and bare values")]
    MixedBlock {
        /// Index of the closing token
        position: usize,
        /// Keyword of the offending block
        keyword: String,
    },

    /// Blocks are nested deeper than the parser allows.
    #[error("Nesting depth {depth} exceeds the limit of {limit}")]
    DepthLimitExceeded {
        /// Depth that was reached
        depth: usize,
        /// Configured maximum depth
        limit: usize,
    },

    /// A value that is not a statement was handed to a script mutation.
    ///
    /// The script is left unchanged.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the operation accepts
        expected: String,
        /// What it was given
        found: String,
    },

    /// Index passed to a positional script operation is out of range.
    #[error("Index {index} out of bounds for script of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Length of the script at the time of the call
        len: usize,
    },

    /// The write destination lies inside a protected location.
    ///
    /// Nothing is written when this error is returned.
    #[error("Refusing to write into protected location: {path}")]
    ProtectedDestination {
        /// The rejected destination
        path: String,
    },

    /// Error reading or writing JSON.
    ///
    /// Wraps errors from the `serde_json` crate.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    ///
    /// Wraps errors from standard I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    /// Shorthand for a [`ScriptError::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ScriptError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Type alias for Results using `ScriptError`.
pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_block_display() {
        let error = ScriptError::UnclosedBlock {
            position: 12,
            message: "1 block(s) left open".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("token 12"));
        assert!(display.contains("1 block(s) left open"));
    }

    #[test]
    fn test_mixed_block_display() {
        let error = ScriptError::MixedBlock {
            position: 7,
            keyword: "focus".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("'focus'"));
        assert!(display.contains("token 7"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let error = ScriptError::type_mismatch("a single statement", "3 statements");
        let display = format!("{}", error);
        assert!(display.contains("expected a single statement"));
        assert!(display.contains("found 3 statements"));
    }

    #[test]
    fn test_protected_destination_display() {
        let error = ScriptError::ProtectedDestination {
            path: "C:/Steam/steamapps/common/Hearts of Iron IV/common/x.txt".to_string(),
        };
        assert!(format!("{}", error).contains("Hearts of Iron IV"));
    }

    #[test]
    fn test_depth_limit_display() {
        let error = ScriptError::DepthLimitExceeded { depth: 3, limit: 2 };
        let display = format!("{}", error);
        assert!(display.contains("depth 3"));
        assert!(display.contains("limit of 2"));
    }

    #[test]
    fn test_json_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error: ScriptError = json_error.into();
        assert!(matches!(error, ScriptError::Json(_)));
    }

    #[test]
    fn test_io_error_from() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ScriptError = io_error.into();
        assert!(matches!(error, ScriptError::Io(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScriptError>();
    }
}
