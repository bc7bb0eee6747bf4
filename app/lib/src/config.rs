//! Configuration types for the pdx-script library.
//!
//! This module provides configuration structs for the parser, the writer and
//! the file layer. Every struct has sensible defaults, `with_*` builder
//! methods and can be deserialized from JSON, so a tool can keep its
//! settings in a config file:
//!
//! ```json
//! {
//!   "parser": { "max_depth": 256 },
//!   "writer": { "indent": "    ", "header": "# my mod" },
//!   "io": { "protected_paths": ["Steam/steamapps/common"], "write_bom": false }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Default maximum block nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default first line of written scripts.
pub const DEFAULT_HEADER: &str = "#This code is generated by pdx-script.";

/// Default last line of written scripts.
pub const DEFAULT_FOOTER: &str = "#EOF";

/// Default location that must never be written to: the game install itself.
pub const DEFAULT_PROTECTED_PATH: &str = "Steam/steamapps/common/Hearts of Iron IV";

/// Configuration for the script parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of nested blocks.
    ///
    /// This limit bounds the memory spent on malformed or hostile input.
    /// Real game files rarely go past a few dozen levels.
    ///
    /// Default: 512
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` is 0.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        assert!(max_depth > 0, "max_depth must be at least 1");
        self.max_depth = max_depth;
        self
    }
}

/// Configuration for the script writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Indentation unit, repeated once per nesting level.
    ///
    /// Default: one tab
    pub indent: String,

    /// Comment line written before the statements.
    ///
    /// Default: [`DEFAULT_HEADER`]
    pub header: String,

    /// Comment line written after the statements.
    ///
    /// Default: [`DEFAULT_FOOTER`]
    pub footer: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl WriterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation unit.
    pub fn with_indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set the header line.
    ///
    /// The header is parsed back as a comment, so it should start with `#`.
    pub fn with_header<S: Into<String>>(mut self, header: S) -> Self {
        self.header = header.into();
        self
    }

    /// Set the footer line.
    pub fn with_footer<S: Into<String>>(mut self, footer: S) -> Self {
        self.footer = footer.into();
        self
    }
}

/// Configuration for reading and writing script files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Path fragments that a write destination must not contain.
    ///
    /// Compared against the destination with `\` normalized to `/`.
    ///
    /// Default: [`DEFAULT_PROTECTED_PATH`]
    pub protected_paths: Vec<String>,

    /// Whether written files start with a UTF-8 byte order mark.
    ///
    /// The games read and write `utf-8-sig`, so this is on by default.
    pub write_bom: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            protected_paths: vec![DEFAULT_PROTECTED_PATH.to_string()],
            write_bom: true,
        }
    }
}

impl IoConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a protected path fragment.
    pub fn with_protected_path<S: Into<String>>(mut self, fragment: S) -> Self {
        self.protected_paths.push(fragment.into());
        self
    }

    /// Replace all protected path fragments.
    pub fn with_protected_paths<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_paths = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the byte order mark on written files.
    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }
}

/// All settings, as loaded from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Parser settings.
    pub parser: ParserConfig,
    /// Writer settings.
    pub writer: WriterConfig,
    /// File settings.
    pub io: IoConfig,
}

impl ScriptConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Set the writer configuration.
    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Set the file configuration.
    pub fn with_io(mut self, io: IoConfig) -> Self {
        self.io = io;
        self
    }

    /// Load a configuration from JSON text.
    ///
    /// Missing sections and fields keep their defaults.
    pub fn from_json(input: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_default() {
        assert_eq!(ParserConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_parser_config_builder() {
        assert_eq!(ParserConfig::new().with_max_depth(8).max_depth, 8);
    }

    #[test]
    #[should_panic(expected = "max_depth must be at least 1")]
    fn test_parser_config_rejects_zero_depth() {
        let _ = ParserConfig::new().with_max_depth(0);
    }

    #[test]
    fn test_writer_config_default() {
        let config = WriterConfig::default();
        assert_eq!(config.indent, "\t");
        assert_eq!(config.header, DEFAULT_HEADER);
        assert_eq!(config.footer, "#EOF");
    }

    #[test]
    fn test_writer_config_builder() {
        let config = WriterConfig::new()
            .with_indent("  ")
            .with_header("# head")
            .with_footer("# tail");
        assert_eq!(config.indent, "  ");
        assert_eq!(config.header, "# head");
        assert_eq!(config.footer, "# tail");
    }

    #[test]
    fn test_io_config_builder() {
        let config = IoConfig::new().with_protected_path("mods/vanilla").with_bom(false);
        assert_eq!(config.protected_paths.len(), 2);
        assert!(!config.write_bom);

        let config = IoConfig::new().with_protected_paths(["a", "b", "c"]);
        assert_eq!(config.protected_paths, ["a", "b", "c"]);
    }

    #[test]
    fn test_script_config_from_partial_json() {
        let config = ScriptConfig::from_json(r#"{"parser": {"max_depth": 16}, "io": {"write_bom": false}}"#)
            .unwrap();
        assert_eq!(config.parser.max_depth, 16);
        assert!(!config.io.write_bom);
        assert_eq!(config.io.protected_paths, [DEFAULT_PROTECTED_PATH]);
        assert_eq!(config.writer, WriterConfig::default());
    }

    #[test]
    fn test_script_config_from_empty_json() {
        assert_eq!(ScriptConfig::from_json("{}").unwrap(), ScriptConfig::default());
    }

    #[test]
    fn test_script_config_rejects_bad_json() {
        assert!(matches!(
            ScriptConfig::from_json("{\"parser\": 3}"),
            Err(crate::ScriptError::Json(_))
        ));
    }

    #[test]
    fn test_config_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParserConfig>();
        assert_send_sync::<WriterConfig>();
        assert_send_sync::<IoConfig>();
        assert_send_sync::<ScriptConfig>();
    }
}
