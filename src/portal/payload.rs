//! Response bodies of the result portal.
//!
//! The portal is loosely typed: fields may be missing, `null`, or carry
//! numbers as strings. Decoding never fails on a missing or oddly typed field;
//! it fails only when the body is not the expected JSON shape at all.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload<T> {
    Parsed(T),
    Malformed(String),
}

/// `GET studentInfo` body. `student_name` is absent when the field is
/// missing, `null`, blank, or not a string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentInfoPayload {
    #[serde(rename = "studentName", default, deserialize_with = "lenient_text")]
    pub student_name: Option<String>,
}

/// One element of the `GET result` array. `cgpa` accepts numbers and numeric
/// strings; anything else is absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultEntryPayload {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cgpa: Option<f64>,
}

pub fn parse_student_info(body: &str) -> ParsedPayload<StudentInfoPayload> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => match serde_json::from_value(value) {
            Ok(payload) => ParsedPayload::Parsed(payload),
            Err(err) => ParsedPayload::Malformed(err.to_string()),
        },
        Ok(other) => ParsedPayload::Malformed(format!("expected an object, got {}", kind(&other))),
        Err(err) => ParsedPayload::Malformed(err.to_string()),
    }
}

/// Decodes the first element of the result array; later elements are never
/// inspected. A `null` body is read as an empty result list.
pub fn parse_first_result(body: &str) -> ParsedPayload<Option<ResultEntryPayload>> {
    let entries = match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => return ParsedPayload::Parsed(None),
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            return ParsedPayload::Malformed(format!("expected an array, got {}", kind(&other)))
        }
        Err(err) => return ParsedPayload::Malformed(err.to_string()),
    };
    let Some(first) = entries.into_iter().next() else {
        return ParsedPayload::Parsed(None);
    };
    match first {
        value @ Value::Object(_) => match serde_json::from_value(value) {
            Ok(entry) => ParsedPayload::Parsed(Some(entry)),
            Err(err) => ParsedPayload::Malformed(err.to_string()),
        },
        other => ParsedPayload::Malformed(format!(
            "expected an object as first result, got {}",
            kind(&other)
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_f64).filter(|n| n.is_finite()))
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
