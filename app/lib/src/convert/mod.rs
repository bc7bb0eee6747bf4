//! Conversions between scripts and other formats.

pub mod json;

pub use json::{from_json, parse_json, to_json, to_json_string};
