//! Script tokenizer.
//!
//! Turns script text, one line at a time, into a flat sequence of tokens
//! for the [`ScriptParser`](super::ScriptParser).
//!
//! # Token Types
//!
//! - Words: any run of ordinary characters, e.g. `has_war`, `10`, `GER`
//! - Quoted words: `"hello world"`, kept whole with their quote characters
//! - Operators: `=`, `>`, `<`
//! - Block markers: `{` and `}`
//!
//! Whitespace separates words and is otherwise dropped. `#` starts a
//! comment running to the end of the line. Inside a quoted word every
//! character is literal except `"` and `\`. A backslash keeps the quote
//! right after it from opening or closing a quoted word; everywhere else it
//! is an ordinary word character. Quote and escape state never carry over to the next
//! line, and the tokenizer never fails: malformed input is passed through
//! and left for the parser to reject.

use std::fmt;

use super::operator::Operator;

/// Token types produced by the script tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare or quoted word.
    Word(String),
    /// One of `=`, `>`, `<`.
    Operator(Operator),
    /// `{`
    OpenBlock,
    /// `}`
    CloseBlock,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "word '{}'", word),
            Token::Operator(op) => write!(f, "operator '{}'", op),
            Token::OpenBlock => f.write_str("'{'"),
            Token::CloseBlock => f.write_str("'}'"),
        }
    }
}

/// Line-oriented script tokenizer.
///
/// Feed lines with [`scan_line`](Tokenizer::scan_line) and collect the
/// tokens with [`finish`](Tokenizer::finish), or use the
/// [`tokenize`](Tokenizer::tokenize) and
/// [`tokenize_lines`](Tokenizer::tokenize_lines) shortcuts.
///
/// ```
/// use pdx_script::{Operator, Token, Tokenizer};
///
/// let tokens = Tokenizer::tokenize("name = \"Big Boss\" # leader");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Word("name".to_string()),
///         Token::Operator(Operator::Equal),
///         Token::Word("\"Big Boss\"".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    /// Word being accumulated
    word: String,
    in_quotes: bool,
    /// Previous character was a backslash not itself escaped
    escaped: bool,
}

impl Tokenizer {
    /// Create a tokenizer with no input yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize a whole text, splitting it into lines first.
    pub fn tokenize(input: &str) -> Vec<Token> {
        Self::tokenize_lines(input.lines())
    }

    /// Tokenize a sequence of lines.
    ///
    /// Lines may or may not keep their line terminators.
    pub fn tokenize_lines<I, S>(lines: I) -> Vec<Token>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokenizer = Self::new();
        for line in lines {
            tokenizer.scan_line(line.as_ref());
        }
        tokenizer.finish()
    }

    /// Scan one line, appending its tokens.
    pub fn scan_line(&mut self, line: &str) {
        self.in_quotes = false;
        self.escaped = false;

        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        for c in line.chars() {
            // The flag only outlives a backslash, and only shields a quote.
            let escaped = std::mem::take(&mut self.escaped);

            match c {
                '"' => {
                    self.word.push(c);
                    if !escaped {
                        self.in_quotes = !self.in_quotes;
                    }
                }
                '\\' => {
                    self.word.push(c);
                    self.escaped = !escaped;
                }
                _ if self.in_quotes => self.word.push(c),
                ' ' | '\t' | '\n' | '\r' => self.flush_word(),
                '}' => {
                    self.flush_word();
                    self.tokens.push(Token::CloseBlock);
                }
                '#' => break,
                // Pending word stays buffered.
                '{' => self.tokens.push(Token::OpenBlock),
                '=' | '>' | '<' => {
                    self.flush_word();
                    if let Some(op) = Operator::from_char(c) {
                        self.tokens.push(Token::Operator(op));
                    }
                }
                _ => self.word.push(c),
            }
        }

        self.flush_word();
    }

    /// Consume the tokenizer, returning every token scanned so far.
    pub fn finish(mut self) -> Vec<Token> {
        self.flush_word();
        self.tokens
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            self.tokens.push(Token::Word(std::mem::take(&mut self.word)));
        }
    }
}
