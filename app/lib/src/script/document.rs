//! Script container.
//!
//! A [`Script`] is an ordered sequence of statements. The top level of a
//! parsed file is a script, and so is every nested `{ ... }` block of
//! statements.
//!
//! # Thread Safety
//!
//! `Script` is `Send + Sync`. Concurrent mutation requires external
//! synchronization; read-only sharing needs none.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{Result, ScriptError};

use super::statement::Statement;
use super::writer::ScriptWriter;

/// An ordered sequence of statements.
///
/// The script owns its statements exclusively; a statement's nested block
/// is in turn owned by that statement, so a script is always a tree.
///
/// # Examples
///
/// ```
/// use pdx_script::{Script, Statement};
///
/// let mut script = Script::new();
/// script.push(Statement::scalar("is_capitulated", "yes"));
/// script.insert(0, Statement::scalar("tag", "FIN")).unwrap();
///
/// let keywords: Vec<_> = script.iter().map(|s| s.keyword()).collect();
/// assert_eq!(keywords, ["tag", "is_capitulated"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Create a script from statements, keeping their order.
    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Number of top-level statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the script has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterate over the statements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Iterate mutably over the statements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Statement> {
        self.statements.iter_mut()
    }

    /// The statement at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    /// Mutable access to the statement at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Statement> {
        self.statements.get_mut(index)
    }

    /// The last statement, if any.
    pub fn last(&self) -> Option<&Statement> {
        self.statements.last()
    }

    /// The statements as a slice.
    pub fn as_slice(&self) -> &[Statement] {
        &self.statements
    }

    /// Consume the script, returning its statements.
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// Append a statement at the end.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Insert a statement before position `index`.
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, statement: Statement) -> Result<()> {
        self.check_index(index, self.len() + 1)?;
        self.statements.insert(index, statement);
        Ok(())
    }

    /// Replace the statement at `index`, returning the old one.
    pub fn set(&mut self, index: usize, statement: Statement) -> Result<Statement> {
        self.check_index(index, self.len())?;
        Ok(std::mem::replace(&mut self.statements[index], statement))
    }

    /// Remove and return the statement at `index`.
    pub fn pop(&mut self, index: usize) -> Result<Statement> {
        self.check_index(index, self.len())?;
        Ok(self.statements.remove(index))
    }

    /// Remove the first statement structurally equal to `statement`.
    ///
    /// Returns the removed statement, or `None` when nothing matched.
    pub fn remove(&mut self, statement: &Statement) -> Option<Statement> {
        let index = self.statements.iter().position(|s| s == statement)?;
        Some(self.statements.remove(index))
    }

    /// Append every statement of `other`, keeping its order.
    pub fn concat(&mut self, other: Script) {
        self.statements.extend(other.statements);
    }

    /// Append every statement of every script in `others`, in order.
    pub fn concat_all<I>(&mut self, others: I)
    where
        I: IntoIterator<Item = Script>,
    {
        for other in others {
            self.concat(other);
        }
    }

    /// Append anything convertible into a statement.
    ///
    /// A failed conversion is a [`ScriptError::TypeMismatch`] and leaves
    /// the script unchanged.
    ///
    /// ```
    /// use pdx_script::Script;
    ///
    /// let mut script = Script::new();
    /// script.try_push("has_war = yes").unwrap();
    /// assert!(script.try_push("a = b c = d").is_err());
    /// assert_eq!(script.len(), 1);
    /// ```
    pub fn try_push<T>(&mut self, value: T) -> Result<()>
    where
        T: TryInto<Statement, Error = ScriptError>,
    {
        let statement = value.try_into()?;
        self.push(statement);
        Ok(())
    }

    /// Insert anything convertible into a statement before `index`.
    pub fn try_insert<T>(&mut self, index: usize, value: T) -> Result<()>
    where
        T: TryInto<Statement, Error = ScriptError>,
    {
        self.check_index(index, self.len() + 1)?;
        let statement = value.try_into()?;
        self.insert(index, statement)
    }

    /// Replace the statement at `index` with anything convertible into one.
    pub fn try_set<T>(&mut self, index: usize, value: T) -> Result<Statement>
    where
        T: TryInto<Statement, Error = ScriptError>,
    {
        self.check_index(index, self.len())?;
        let statement = value.try_into()?;
        self.set(index, statement)
    }

    /// The first top-level statement with the given keyword.
    pub fn find(&self, keyword: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.keyword() == keyword)
    }

    /// All top-level statements with the given keyword, in order.
    pub fn find_all<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements.iter().filter(move |s| s.keyword() == keyword)
    }

    /// All statements reached by a `/`-separated keyword path.
    ///
    /// Each segment but the last descends into the blocks of every matching
    /// statement, so `focus_tree/focus/id` yields the `id` of every focus
    /// of every focus tree. Empty segments are ignored.
    pub fn find_path(&self, path: &str) -> Vec<&Statement> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Vec::new();
        };

        let mut frontier: Vec<&Script> = vec![self];
        for segment in parents {
            frontier = frontier
                .iter()
                .flat_map(|script| script.iter())
                .filter(|s| s.keyword() == *segment)
                .filter_map(|s| s.value().as_block())
                .collect();
        }

        frontier
            .iter()
            .flat_map(|script| script.iter())
            .filter(|s| s.keyword() == *last)
            .collect()
    }

    /// Total number of statements, counting nested blocks.
    pub fn statement_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Script> = vec![self];
        while let Some(script) = pending.pop() {
            count += script.len();
            pending.extend(script.iter().filter_map(|s| s.value().as_block()));
        }
        count
    }

    /// Deepest block nesting below this script; 0 for a flat script.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Script, usize)> = vec![(self, 0)];
        while let Some((script, level)) = pending.pop() {
            deepest = deepest.max(level);
            for statement in script.iter() {
                if let Some(child) = statement.value().as_block() {
                    pending.push((child, level + 1));
                }
            }
        }
        deepest
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(ScriptError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
        }
    }
}

impl From<Vec<Statement>> for Script {
    fn from(statements: Vec<Statement>) -> Self {
        Self::from_statements(statements)
    }
}

impl FromIterator<Statement> for Script {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Statement> for Script {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.statements.extend(iter);
    }
}

impl IntoIterator for Script {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a mut Script {
    type Item = &'a mut Statement;
    type IntoIter = std::slice::IterMut<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter_mut()
    }
}

impl Index<usize> for Script {
    type Output = Statement;

    fn index(&self, index: usize) -> &Statement {
        &self.statements[index]
    }
}

impl IndexMut<usize> for Script {
    fn index_mut(&mut self, index: usize) -> &mut Statement {
        &mut self.statements[index]
    }
}

/// Writes the statements without the generated header and footer lines.
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in ScriptWriter::new().write_body(self) {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
