//! JSON reading and writing.
//!
//! This module converts between scripts and a plain JSON representation,
//! for tools that would rather not deal with script syntax. A script is an
//! array of statement objects:
//!
//! ```json
//! [
//!   { "keyword": "flag", "operator": "=", "value": "yes" },
//!   { "keyword": "items", "operator": "=", "value": ["a", "b", "c"] },
//!   { "keyword": "block", "operator": "=", "value": [
//!       { "keyword": "inner", "operator": ">", "value": "1" }
//!   ] },
//!   { "keyword": "empty", "operator": "=", "value": [] }
//! ]
//! ```
//!
//! A string value is a scalar, an array of strings is a list, an array of
//! objects is a block and `[]` is an empty block. When reading, `operator`
//! defaults to `=`, numbers become their decimal text, booleans become
//! `yes`/`no`, and text that is not a valid word is quoted. Keywords are
//! never quoted: one that is empty or not a single word is rejected.

use serde_json::{Map, Value as Json};

use crate::error::{Result, ScriptError};
use crate::script::escape::{needs_quoting, to_scalar_word};
use crate::script::{Operator, Script, Statement, Value};

/// Convert a script to its JSON representation.
///
/// # Examples
///
/// ```
/// use pdx_script::convert::json::to_json;
/// use pdx_script::{Script, Statement};
///
/// let script = Script::from(vec![Statement::scalar("flag", "yes")]);
/// let json = to_json(&script);
/// assert_eq!(json[0]["keyword"], "flag");
/// assert_eq!(json[0]["value"], "yes");
/// ```
pub fn to_json(script: &Script) -> Json {
    Json::Array(script.iter().map(statement_to_json).collect())
}

/// Convert a script to JSON text.
pub fn to_json_string(script: &Script, pretty: bool) -> Result<String> {
    let json = to_json(script);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

/// Build a script from its JSON representation.
///
/// # Errors
///
/// [`ScriptError::TypeMismatch`] when the JSON does not describe a script.
pub fn from_json(json: &Json) -> Result<Script> {
    match json {
        Json::Array(items) => items.iter().map(Statement::try_from).collect(),
        other => Err(ScriptError::type_mismatch(
            "an array of statements",
            kind(other),
        )),
    }
}

/// Parse JSON text into a script.
///
/// # Errors
///
/// [`ScriptError::Json`] for malformed JSON, [`ScriptError::TypeMismatch`]
/// for well-formed JSON that does not describe a script.
pub fn parse_json(input: &str) -> Result<Script> {
    let json: Json = serde_json::from_str(input)?;
    from_json(&json)
}

fn statement_to_json(statement: &Statement) -> Json {
    let value = match statement.value() {
        Value::Scalar(scalar) => Json::String(scalar.clone()),
        Value::List(items) => Json::Array(items.iter().cloned().map(Json::String).collect()),
        Value::Block(children) => to_json(children),
    };

    let mut object = Map::new();
    object.insert("keyword".to_string(), Json::String(statement.keyword().to_string()));
    object.insert(
        "operator".to_string(),
        Json::String(statement.operator().literal().to_string()),
    );
    object.insert("value".to_string(), value);
    Json::Object(object)
}

impl TryFrom<&Json> for Statement {
    type Error = ScriptError;

    fn try_from(json: &Json) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| ScriptError::type_mismatch("a statement object", kind(json)))?;

        let keyword = match object.get("keyword") {
            Some(Json::String(keyword)) if !needs_quoting(keyword) => keyword.clone(),
            Some(Json::String(keyword)) => {
                return Err(ScriptError::type_mismatch("a single-word keyword", format!("'{}'", keyword)))
            }
            Some(other) => return Err(ScriptError::type_mismatch("a string keyword", kind(other))),
            None => return Err(ScriptError::type_mismatch("a statement object", "an object without 'keyword'")),
        };

        let operator = match object.get("operator") {
            None => Operator::Equal,
            Some(Json::String(literal)) => Operator::from_literal(literal).ok_or_else(|| {
                ScriptError::type_mismatch("operator '=', '>' or '<'", format!("'{}'", literal))
            })?,
            Some(other) => return Err(ScriptError::type_mismatch("a string operator", kind(other))),
        };

        let value = match object.get("value") {
            Some(value) => value_from_json(value)?,
            None => return Err(ScriptError::type_mismatch("a statement object", "an object without 'value'")),
        };

        Ok(Statement::new(keyword, operator, value))
    }
}

impl TryFrom<Json> for Statement {
    type Error = ScriptError;

    fn try_from(json: Json) -> Result<Self> {
        Statement::try_from(&json)
    }
}

fn value_from_json(json: &Json) -> Result<Value> {
    if let Some(word) = scalar_from_json(json) {
        return Ok(Value::Scalar(word));
    }

    let items = match json {
        Json::Array(items) => items,
        other => return Err(ScriptError::type_mismatch("a scalar, list or block value", kind(other))),
    };

    if items.iter().all(Json::is_object) {
        return from_json(json).map(Value::Block);
    }

    items
        .iter()
        .map(|item| {
            scalar_from_json(item).ok_or_else(|| {
                ScriptError::type_mismatch("only scalars or only statements in an array", kind(item))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

fn scalar_from_json(json: &Json) -> Option<String> {
    match json {
        Json::String(text) => Some(to_scalar_word(text).into_owned()),
        Json::Number(number) => Some(number.to_string()),
        Json::Bool(true) => Some("yes".to_string()),
        Json::Bool(false) => Some("no".to_string()),
        _ => None,
    }
}

fn kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{ScriptParser, ScriptWriter};
    use serde_json::json;

    fn sample() -> Script {
        Script::from(vec![
            Statement::scalar("flag", "yes"),
            Statement::list("items", ["a", "b", "c"]),
            Statement::block(
                "block",
                Script::from(vec![Statement::new("inner", Operator::Greater, "1")]),
            ),
            Statement::block("empty", Script::new()),
        ])
    }

    #[test]
    fn test_to_json_shapes() {
        let json = to_json(&sample());
        assert_eq!(
            json,
            json!([
                { "keyword": "flag", "operator": "=", "value": "yes" },
                { "keyword": "items", "operator": "=", "value": ["a", "b", "c"] },
                { "keyword": "block", "operator": "=", "value": [
                    { "keyword": "inner", "operator": ">", "value": "1" }
                ] },
                { "keyword": "empty", "operator": "=", "value": [] }
            ])
        );
    }

    #[test]
    fn test_json_round_trip() {
        let script = sample();
        assert_eq!(from_json(&to_json(&script)).unwrap(), script);
    }

    #[test]
    fn test_json_text_round_trip() {
        let script = sample();
        for pretty in [false, true] {
            let text = to_json_string(&script, pretty).unwrap();
            assert_eq!(parse_json(&text).unwrap(), script);
        }
    }

    #[test]
    fn test_from_json_defaults_and_coercions() {
        let script = from_json(&json!([
            { "keyword": "num", "value": 10 },
            { "keyword": "ok", "value": true },
            { "keyword": "name", "value": "Big Boss" },
            { "keyword": "color", "value": [1, 2.5, "x y"] }
        ]))
        .unwrap();

        assert_eq!(script[0], Statement::scalar("num", "10"));
        assert_eq!(script[1], Statement::scalar("ok", "yes"));
        assert_eq!(script[2], Statement::scalar("name", "\"Big Boss\""));
        assert_eq!(script[3].value(), &Value::list(["1", "2.5", "\"x y\""]));
    }

    #[test]
    fn test_from_json_type_mismatches() {
        let cases = [
            json!({ "keyword": "a", "value": "b" }),
            json!([1]),
            json!([{ "value": "b" }]),
            json!([{ "keyword": 3, "value": "b" }]),
            json!([{ "keyword": "two words", "value": "b" }]),
            json!([{ "keyword": "", "value": "b" }]),
            json!([{ "keyword": "a=b", "value": "c" }]),
            json!([{ "keyword": "a", "operator": ">=", "value": "b" }]),
            json!([{ "keyword": "a" }]),
            json!([{ "keyword": "a", "value": null }]),
            json!([{ "keyword": "a", "value": ["x", { "keyword": "b", "value": "c" }] }]),
        ];
        for case in cases {
            let result = from_json(&case);
            assert!(
                matches!(result, Err(ScriptError::TypeMismatch { .. })),
                "expected type mismatch for {case}"
            );
        }
    }

    #[test]
    fn test_multiline_text_survives_writing() {
        let script = parse_json(r#"[{"keyword":"desc","value":"line one\nline two"}]"#).unwrap();
        assert_eq!(script[0].value(), &Value::scalar(r#""line one\nline two""#));

        let text = ScriptWriter::new().write(&script);
        assert_eq!(ScriptParser::new().parse(&text).unwrap(), script);
    }

    #[test]
    fn test_keyword_with_spaces_is_rejected() {
        let error = parse_json(r#"[{"keyword":"two words","value":"x"}]"#).unwrap_err();
        assert!(error.to_string().contains("'two words'"));
    }

    #[test]
    fn test_parse_json_malformed() {
        assert!(matches!(parse_json("[{"), Err(ScriptError::Json(_))));
    }

    #[test]
    fn test_try_push_json_statement() {
        let mut script = Script::new();
        script
            .try_push(json!({ "keyword": "tag", "operator": "=", "value": "FIN" }))
            .unwrap();
        assert!(script.try_push(json!("not a statement")).is_err());
        assert_eq!(script.len(), 1);
    }
}
