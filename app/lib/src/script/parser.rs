//! Script parser.
//!
//! This module rebuilds the statement tree from the tokenizer's flat token
//! sequence. It is iterative: every open `{` pushes the enclosing block on
//! an explicit stack and every `}` pops it, so deeply nested files never
//! touch the call stack.

use crate::config::ParserConfig;
use crate::error::{Result, ScriptError};

use super::document::Script;
use super::operator::Operator;
use super::statement::{Statement, Value};
use super::tokenizer::{Token, Tokenizer};

/// Script parser.
///
/// Parses script text into a [`Script`] tree.
///
/// # Example
///
/// ```
/// use pdx_script::{ScriptParser, Statement, Value};
///
/// let script = ScriptParser::new().parse("flag = yes\nitems = { a b c }\n").unwrap();
/// assert_eq!(script[0], Statement::scalar("flag", "yes"));
/// assert_eq!(script[1].value(), &Value::list(["a", "b", "c"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptParser {
    config: ParserConfig,
}

/// A block whose contents are still being read.
#[derive(Debug, Default)]
struct Frame {
    statements: Script,
    /// Bare words not yet claimed by an operator
    words: Vec<String>,
}

impl Frame {
    /// Resolve the finished block into the value of its statement.
    fn into_value(self, position: usize, keyword: &str) -> Result<Value> {
        match (self.statements.is_empty(), self.words.is_empty()) {
            (false, false) => Err(ScriptError::MixedBlock {
                position,
                keyword: keyword.to_string(),
            }),
            (false, true) => Ok(Value::Block(self.statements)),
            (true, false) => Ok(Value::List(self.words)),
            (true, true) => Ok(Value::empty_block()),
        }
    }
}

/// An enclosing block suspended while a nested one is read.
#[derive(Debug)]
struct OpenBlock {
    parent: Frame,
    keyword: String,
    operator: Operator,
}

impl ScriptParser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a new parser with the given configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The parser's configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse script text.
    pub fn parse(&self, input: &str) -> Result<Script> {
        self.build(Tokenizer::tokenize(input))
    }

    /// Parse a sequence of script lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<Script>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.build(Tokenizer::tokenize_lines(lines))
    }

    /// Build the statement tree from a token sequence.
    ///
    /// # Errors
    ///
    /// - [`ScriptError::UnclosedBlock`] when a `{` is never closed or a `}`
    ///   has no matching `{`
    /// - [`ScriptError::MixedBlock`] when a block holds both statements and
    ///   bare words
    /// - [`ScriptError::Syntax`] for operators or blocks without a keyword,
    ///   keywords without a value, and bare words at the top level
    /// - [`ScriptError::DepthLimitExceeded`] past `max_depth` nested blocks
    pub fn build<I>(&self, tokens: I) -> Result<Script>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut current = Frame::default();
        let mut stack: Vec<OpenBlock> = Vec::new();
        // Keyword and operator waiting for their value
        let mut pending: Option<(String, Operator)> = None;
        let mut consumed = 0;

        for (position, token) in tokens.into_iter().enumerate() {
            consumed = position + 1;

            match token {
                Token::Operator(operator) => {
                    if let Some((keyword, _)) = &pending {
                        return Err(syntax(
                            position,
                            format!("'{}' is followed by a second operator '{}'", keyword, operator),
                        ));
                    }
                    let keyword = current.words.pop().ok_or_else(|| {
                        syntax(position, format!("operator '{}' has no keyword", operator))
                    })?;
                    pending = Some((keyword, operator));
                }
                Token::OpenBlock => {
                    // `key {` without an operator is how empty blocks are written.
                    let (keyword, operator) = match pending.take() {
                        Some(pair) => pair,
                        None => match current.words.pop() {
                            Some(keyword) => (keyword, Operator::Equal),
                            None => return Err(syntax(position, "'{' has no keyword")),
                        },
                    };
                    if stack.len() >= self.config.max_depth {
                        return Err(ScriptError::DepthLimitExceeded {
                            depth: stack.len() + 1,
                            limit: self.config.max_depth,
                        });
                    }
                    stack.push(OpenBlock {
                        parent: std::mem::take(&mut current),
                        keyword,
                        operator,
                    });
                }
                Token::CloseBlock => {
                    if let Some((keyword, _)) = pending.take() {
                        return Err(syntax(
                            position,
                            format!("'{}' has no value before '}}'", keyword),
                        ));
                    }
                    let open = stack.pop().ok_or_else(|| ScriptError::UnclosedBlock {
                        position,
                        message: "'}' has no matching '{'".to_string(),
                    })?;
                    let block = std::mem::replace(&mut current, open.parent);
                    let value = block.into_value(position, &open.keyword)?;
                    current
                        .statements
                        .push(Statement::new(open.keyword, open.operator, value));
                }
                Token::Word(word) => match pending.take() {
                    Some((keyword, operator)) => {
                        current
                            .statements
                            .push(Statement::new(keyword, operator, Value::Scalar(word)));
                    }
                    None => current.words.push(word),
                },
            }
        }

        if let Some(innermost) = stack.last() {
            return Err(ScriptError::UnclosedBlock {
                position: consumed,
                message: format!(
                    "{} block(s) left open, innermost is '{}'",
                    stack.len(),
                    innermost.keyword
                ),
            });
        }
        if let Some((keyword, _)) = pending {
            return Err(syntax(
                consumed,
                format!("'{}' has no value at end of input", keyword),
            ));
        }
        if !current.words.is_empty() {
            return Err(syntax(
                consumed,
                format!("bare words outside any block: {}", current.words.join(" ")),
            ));
        }

        Ok(current.statements)
    }
}

fn syntax(position: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Syntax {
        position,
        message: message.into(),
    }
}
