//! Statements and their values.
//!
//! A statement is one `keyword operator value` triple such as
//! `has_war = yes`, `num_of_factories > 10` or `limit = { ... }`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScriptError};

use super::document::Script;
use super::operator::Operator;
use super::parser::ScriptParser;

/// The value half of a statement.
///
/// A value has exactly one of three shapes, fixed when it is built:
///
/// - `Scalar`: a single word, e.g. `yes` or `"quoted text"`
/// - `List`: a block of bare words, e.g. `{ 1 2 3 }`
/// - `Block`: a block of child statements, e.g. `{ tag = GER }`
///
/// An empty `{ }` parses as an empty `Block`. An empty `List` is legal and
/// is written the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single scalar word. Quote characters, when present, are kept.
    Scalar(String),
    /// A bracketed list of scalar words, in source order.
    List(Vec<String>),
    /// A nested block of statements.
    Block(Script),
}

/// Which of the three value shapes a [`Value`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// See [`Value::Scalar`].
    Scalar,
    /// See [`Value::List`].
    List,
    /// See [`Value::Block`].
    Block,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Scalar => "scalar",
            Shape::List => "list",
            Shape::Block => "block",
        })
    }
}

impl Value {
    /// Create a scalar value.
    pub fn scalar<S: Into<String>>(value: S) -> Self {
        Value::Scalar(value.into())
    }

    /// Create a list value from any sequence of words.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Create an empty block value.
    pub fn empty_block() -> Self {
        Value::Block(Script::new())
    }

    /// The shape of this value.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::List(_) => Shape::List,
            Value::Block(_) => Shape::Block,
        }
    }

    /// Whether this is a list or block with no contents.
    ///
    /// Scalars are never empty, even when their text is.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Block(script) => script.is_empty(),
        }
    }

    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The list items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable list items, if this is a list.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The child statements, if this is a block.
    pub fn as_block(&self) -> Option<&Script> {
        match self {
            Value::Block(script) => Some(script),
            _ => None,
        }
    }

    /// Mutable child statements, if this is a block.
    pub fn as_block_mut(&mut self) -> Option<&mut Script> {
        match self {
            Value::Block(script) => Some(script),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Script> for Value {
    fn from(script: Script) -> Self {
        Value::Block(script)
    }
}

/// One `keyword operator value` triple.
///
/// # Examples
///
/// ```
/// use pdx_script::{Operator, Statement, Value};
///
/// let flag = Statement::scalar("set_country_flag", "GER_has_hilt");
/// assert_eq!(flag.keyword(), "set_country_flag");
/// assert_eq!(flag.operator(), Operator::Equal);
/// assert_eq!(flag.value(), &Value::scalar("GER_has_hilt"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    keyword: String,
    operator: Operator,
    value: Value,
}

impl Statement {
    /// Create a statement from its three parts.
    pub fn new<K, V>(keyword: K, operator: Operator, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            keyword: keyword.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create a `keyword = value` statement with a scalar value.
    pub fn scalar<K: Into<String>, V: Into<String>>(keyword: K, value: V) -> Self {
        Self::new(keyword, Operator::Equal, Value::Scalar(value.into()))
    }

    /// Create a `keyword = { items... }` statement with a list value.
    pub fn list<K, I, S>(keyword: K, items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(keyword, Operator::Equal, Value::list(items))
    }

    /// Create a `keyword = { statements... }` statement with a block value.
    pub fn block<K: Into<String>>(keyword: K, children: Script) -> Self {
        Self::new(keyword, Operator::Equal, Value::Block(children))
    }

    /// The keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Replace the keyword.
    pub fn set_keyword<K: Into<String>>(&mut self, keyword: K) {
        self.keyword = keyword.into();
    }

    /// Replace the operator.
    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
    }

    /// Replace the value, possibly changing its shape.
    ///
    /// Returns the previous value.
    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> Value {
        std::mem::replace(&mut self.value, value.into())
    }

    /// Split the statement into its parts.
    pub fn into_parts(self) -> (String, Operator, Value) {
        (self.keyword, self.operator, self.value)
    }
}

/// Parse a snippet that holds exactly one statement.
///
/// Snippets with zero or several statements are a
/// [`ScriptError::TypeMismatch`]; malformed text surfaces the parser's error.
impl FromStr for Statement {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self> {
        let script = ScriptParser::new().parse(s)?;
        let count = script.len();
        let mut statements = script.into_iter();
        match (statements.next(), count) {
            (Some(statement), 1) => Ok(statement),
            (_, n) => Err(ScriptError::type_mismatch(
                "a single statement",
                format!("{} statements", n),
            )),
        }
    }
}

impl TryFrom<&str> for Statement {
    type Error = ScriptError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
