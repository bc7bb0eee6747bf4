//! Statement operators.
//!
//! Every statement binds its keyword to its value through one of three
//! comparison-style operators.

use std::fmt;

/// The operator joining a statement's keyword and value.
///
/// | Variant | Literal |
/// |---------|---------|
/// | `Equal` | `=` |
/// | `Greater` | `>` |
/// | `Less` | `<` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// `=`: assignment, scope entry or equality check.
    #[default]
    Equal,
    /// `>`: greater-than comparison.
    Greater,
    /// `<`: less-than comparison.
    Less,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 3] = [Operator::Equal, Operator::Greater, Operator::Less];

    /// The printable form of the operator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdx_script::Operator;
    ///
    /// assert_eq!(Operator::Greater.literal(), ">");
    /// ```
    pub fn literal(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::Less => "<",
        }
    }

    /// Map an operator character to its operator, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Operator::Equal),
            '>' => Some(Operator::Greater),
            '<' => Some(Operator::Less),
            _ => None,
        }
    }

    /// Map a literal (`=`, `>`, `<`) back to its operator.
    pub fn from_literal(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}
