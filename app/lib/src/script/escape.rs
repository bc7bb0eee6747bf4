//! Quoting for scalar words.
//!
//! Scalars are stored exactly as they appear in a script, quotes included.
//! A bare word cannot contain whitespace or any of `= { } < > # " \`; text
//! that does must be written as a quoted word, with `"` and `\` inside it
//! escaped by a backslash. Line breaks become `\n` and `\r`, since a quoted
//! word never spans lines.
//!
//! | Text | Scalar word |
//! |------|-------------|
//! | `GER` | `GER` |
//! | `Big Boss` | `"Big Boss"` |
//! | `say "hi"` | `"say \"hi\""` |
//! | `C:\mods` | `"C:\\mods"` |

use std::borrow::Cow;

/// Characters that end or alter a bare word.
const SPECIAL: &[char] = &[' ', '\t', '\n', '\r', '=', '{', '}', '<', '>', '#', '"', '\\'];

/// Whether `word` is a complete quoted word such as `"a b"`.
///
/// # Example
///
/// ```
/// use pdx_script::escape::is_quoted;
///
/// assert!(is_quoted("\"Big Boss\""));
/// assert!(!is_quoted("Boss"));
/// assert!(!is_quoted("\"open \\\""));
/// ```
pub fn is_quoted(word: &str) -> bool {
    if word.len() < 2 || !word.starts_with('"') || !word.ends_with('"') {
        return false;
    }
    // No unescaped quote inside, and the closing quote is not escaped.
    let mut escaped = false;
    for c in word[1..word.len() - 1].chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return false,
            _ => {}
        }
    }
    !escaped
}

/// Whether `text` has to be quoted to survive as a single scalar word.
///
/// Already-quoted single-line words and plain identifiers need no quoting;
/// empty text and text with whitespace or syntax characters do.
pub fn needs_quoting(text: &str) -> bool {
    if is_quoted(text) {
        return text.contains(['\n', '\r']);
    }
    text.is_empty() || text.contains(SPECIAL)
}

/// Wrap `text` in quotes, escaping `"` and `\` and spelling line breaks
/// as `\n` and `\r`.
///
/// # Example
///
/// ```
/// use pdx_script::escape::quote;
///
/// assert_eq!(quote("say \"hi\""), r#""say \"hi\"""#);
/// ```
pub fn quote(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    result.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Undo [`quote`].
///
/// Words that are not quoted are returned unchanged.
///
/// # Example
///
/// ```
/// use pdx_script::escape::unquote;
///
/// assert_eq!(unquote(r#""say \"hi\"""#), "say \"hi\"");
/// assert_eq!(unquote("GER"), "GER");
/// ```
pub fn unquote(word: &str) -> Cow<'_, str> {
    if !is_quoted(word) {
        return Cow::Borrowed(word);
    }

    let inner = &word[1..word.len() - 1];
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some(next) => result.push(next),
                None => {}
            }
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Turn arbitrary text into a scalar word, quoting only when required.
///
/// # Example
///
/// ```
/// use pdx_script::escape::to_scalar_word;
///
/// assert_eq!(to_scalar_word("yes"), "yes");
/// assert_eq!(to_scalar_word("Big Boss"), "\"Big Boss\"");
/// assert_eq!(to_scalar_word("\"kept\""), "\"kept\"");
/// ```
pub fn to_scalar_word(text: &str) -> Cow<'_, str> {
    if needs_quoting(text) {
        Cow::Owned(quote(text))
    } else {
        Cow::Borrowed(text)
    }
}
