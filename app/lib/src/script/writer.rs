//! Script writer.
//!
//! This module turns a [`Script`] back into text lines that the parser
//! reads back into the same tree. Comments and original spacing are not
//! preserved; the layout is canonical:
//!
//! ```text
//! #This code is generated by pdx-script.
//! flag = yes
//! items = {
//!     a b c
//! }
//! block = {
//!     inner = yes
//! }
//! empty {
//! }
//! #EOF
//! ```

use crate::config::WriterConfig;

use super::document::Script;
use super::statement::{Statement, Value};

/// Script writer.
///
/// Each call builds its output in a fresh buffer, so one writer can be
/// shared freely.
///
/// # Example
///
/// ```
/// use pdx_script::{Script, ScriptWriter, Statement};
///
/// let script = Script::from(vec![Statement::list("items", ["a", "b"])]);
/// let lines = ScriptWriter::new().write_body(&script);
/// assert_eq!(lines, ["items = {", "\ta b", "}"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptWriter {
    config: WriterConfig,
}

impl ScriptWriter {
    /// Create a new writer with default configuration.
    pub fn new() -> Self {
        Self {
            config: WriterConfig::default(),
        }
    }

    /// Create a new writer with the given configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// The writer's configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write a script as framed text lines.
    ///
    /// The first line is the configured header and the last the footer.
    pub fn write_lines(&self, script: &Script) -> Vec<String> {
        let mut output = Vec::with_capacity(script.len() + 2);
        output.push(self.config.header.clone());
        self.write_statements(&mut output, script, 0);
        output.push(self.config.footer.clone());
        output
    }

    /// Write a script as framed text, one line per `\n`-terminated line.
    pub fn write(&self, script: &Script) -> String {
        let mut text = String::new();
        for line in self.write_lines(script) {
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    /// Write a script's statements without the header and footer.
    pub fn write_body(&self, script: &Script) -> Vec<String> {
        let mut output = Vec::with_capacity(script.len());
        self.write_statements(&mut output, script, 0);
        output
    }

    /// Write every statement of `script` at `level`.
    ///
    /// A nested call (level above 0) also closes the block its caller
    /// opened.
    fn write_statements(&self, output: &mut Vec<String>, script: &Script, level: usize) {
        for statement in script {
            self.write_statement(output, statement, level);
        }

        if level > 0 {
            output.push(format!("{}}}", self.indent(level - 1)));
        }
    }

    fn write_statement(&self, output: &mut Vec<String>, statement: &Statement, level: usize) {
        let indent = self.indent(level);
        let keyword = statement.keyword();
        let operator = statement.operator().literal();

        match statement.value() {
            value if value.is_empty() => {
                output.push(format!("{}{} {{", indent, keyword));
                output.push(format!("{}}}", indent));
            }
            Value::Scalar(scalar) => {
                output.push(format!("{}{} {} {}", indent, keyword, operator, scalar));
            }
            Value::Block(children) => {
                output.push(format!("{}{} {} {{", indent, keyword, operator));
                self.write_statements(output, children, level + 1);
            }
            Value::List(items) => {
                output.push(format!("{}{} {} {{", indent, keyword, operator));
                output.push(format!("{}{}", self.indent(level + 1), items.join(" ")));
                output.push(format!("{}}}", indent));
            }
        }
    }

    fn indent(&self, level: usize) -> String {
        self.config.indent.repeat(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HEADER;
    use crate::script::Operator;

    #[test]
    fn test_write_scalar_and_list() {
        let script = Script::from(vec![
            Statement::scalar("flag", "yes"),
            Statement::list("items", ["a", "b", "c"]),
        ]);
        assert_eq!(
            ScriptWriter::new().write_lines(&script),
            [DEFAULT_HEADER, "flag = yes", "items = {", "\ta b c", "}", "#EOF"]
        );
    }

    #[test]
    fn test_write_nested_blocks() {
        let inner = Script::from(vec![Statement::new("has_war", Operator::Equal, "yes")]);
        let middle = Script::from(vec![
            Statement::block("limit", inner),
            Statement::new("num_of_factories", Operator::Greater, "10"),
        ]);
        let script = Script::from(vec![Statement::block("trigger", middle)]);

        assert_eq!(
            ScriptWriter::new().write_body(&script),
            [
                "trigger = {",
                "\tlimit = {",
                "\t\thas_war = yes",
                "\t}",
                "\tnum_of_factories > 10",
                "}",
            ]
        );
    }

    #[test]
    fn test_write_empty_values_without_operator() {
        let script = Script::from(vec![
            Statement::new("a", Operator::Less, Script::new()),
            Statement::new("b", Operator::Greater, Vec::<String>::new()),
        ]);
        assert_eq!(ScriptWriter::new().write_body(&script), ["a {", "}", "b {", "}"]);
    }

    #[test]
    fn test_write_list_operator() {
        let script = Script::from(vec![Statement::new("x", Operator::Less, Value::list(["1"]))]);
        assert_eq!(ScriptWriter::new().write_body(&script), ["x < {", "\t1", "}"]);
    }

    #[test]
    fn test_write_empty_script_is_just_framing() {
        let writer = ScriptWriter::new();
        assert_eq!(writer.write_lines(&Script::new()), [DEFAULT_HEADER, "#EOF"]);
        assert_eq!(writer.write(&Script::new()), format!("{}\n#EOF\n", DEFAULT_HEADER));
    }

    #[test]
    fn test_custom_indent_and_framing() {
        let config = WriterConfig::new()
            .with_indent("  ")
            .with_header("# head")
            .with_footer("# tail");
        let script = Script::from(vec![Statement::block(
            "a",
            Script::from(vec![Statement::scalar("b", "c")]),
        )]);
        assert_eq!(
            ScriptWriter::with_config(config).write(&script),
            "# head\na = {\n  b = c\n}\n# tail\n"
        );
    }

    #[test]
    fn test_repeated_writes_do_not_share_state() {
        let writer = ScriptWriter::new();
        let script = Script::from(vec![Statement::scalar("a", "b")]);
        let first = writer.write_lines(&script);
        let second = writer.write_lines(&script);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_writer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScriptWriter>();
    }
}
