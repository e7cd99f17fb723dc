//! Payload checks run before any store mutation.
//!
//! Fields are checked in a fixed order (id, title, year, director, length,
//! rating) and the first failure wins. Payloads are inspected as raw JSON so
//! a wrong type produces the field's message instead of a decode error.

use chrono::NaiveTime;
use serde_json::{Map, Value};

use crate::errors::ModelError;

pub const MAX_TEXT_CHARS: usize = 100;
pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2100;
pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 10;
pub const LENGTH_FORMAT: &str = "%H:%M:%S";

type FieldCheck = fn(Option<&Value>) -> Result<(), ModelError>;

const CHECKS: [(&str, FieldCheck); 6] = [
    ("id", validate_id),
    ("title", validate_title),
    ("year", validate_year),
    ("director", validate_director),
    ("length", validate_length),
    ("rating", validate_rating),
];

fn invalid_field(field: &str) -> ModelError {
    ModelError::Validation(format!("Field '{field}' is missing or invalid"))
}

/// Integer in the JSON sense: floats, bools and numeric strings are rejected.
fn as_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn integer_in(value: Option<&Value>, field: &str, min: i64, max: i64) -> Result<(), ModelError> {
    match as_integer(value) {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(invalid_field(field)),
    }
}

fn bounded_text(value: Option<&Value>, field: &str) -> Result<(), ModelError> {
    match value {
        Some(Value::String(s)) if s.chars().count() <= MAX_TEXT_CHARS => Ok(()),
        _ => Err(invalid_field(field)),
    }
}

pub fn validate_id(value: Option<&Value>) -> Result<(), ModelError> {
    as_integer(value).map(|_| ()).ok_or_else(|| invalid_field("id"))
}

pub fn validate_title(value: Option<&Value>) -> Result<(), ModelError> {
    bounded_text(value, "title")
}

pub fn validate_year(value: Option<&Value>) -> Result<(), ModelError> {
    integer_in(value, "year", MIN_YEAR, MAX_YEAR)
}

pub fn validate_director(value: Option<&Value>) -> Result<(), ModelError> {
    bounded_text(value, "director")
}

pub fn validate_length(value: Option<&Value>) -> Result<(), ModelError> {
    match value {
        Some(Value::String(s)) if NaiveTime::parse_from_str(s, LENGTH_FORMAT).is_ok() => Ok(()),
        _ => Err(ModelError::Validation(
            "Invalid 'length' format, expected 'HH:MM:SS'".into(),
        )),
    }
}

pub fn validate_rating(value: Option<&Value>) -> Result<(), ModelError> {
    integer_in(value, "rating", MIN_RATING, MAX_RATING)
}

/// Every field must be present and valid.
pub fn validate_movie(payload: &Map<String, Value>) -> Result<(), ModelError> {
    CHECKS
        .iter()
        .try_for_each(|(field, check)| check(payload.get(*field)))
}

/// Only fields present in the payload are checked.
pub fn validate_patch(payload: &Map<String, Value>) -> Result<(), ModelError> {
    CHECKS.iter().try_for_each(|(field, check)| match payload.get(*field) {
        Some(v) => check(Some(v)),
        None => Ok(()),
    })
}
