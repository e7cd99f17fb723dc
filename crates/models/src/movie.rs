use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::validation::{validate_movie, validate_patch};
use configs::PatchMode;

/// A movie as stored and as returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub director: String,
    /// Running time as `HH:MM:SS`.
    pub length: String,
    pub rating: u8,
}

impl Movie {
    /// Validate a full record and decode it. Unknown keys are dropped.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ModelError> {
        validate_movie(payload)?;
        decode(payload)
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoviePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl MoviePatch {
    pub fn from_payload(payload: &Map<String, Value>, mode: PatchMode) -> Result<Self, ModelError> {
        match mode {
            PatchMode::Partial => validate_patch(payload)?,
            PatchMode::Strict => validate_movie(payload)?,
        }
        decode(payload)
    }

    pub fn apply(self, movie: &mut Movie) {
        if let Some(id) = self.id { movie.id = id; }
        if let Some(title) = self.title { movie.title = title; }
        if let Some(year) = self.year { movie.year = year; }
        if let Some(director) = self.director { movie.director = director; }
        if let Some(length) = self.length { movie.length = length; }
        if let Some(rating) = self.rating { movie.rating = rating; }
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: &Map<String, Value>) -> Result<T, ModelError> {
    serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| ModelError::Validation(e.to_string()))
}
