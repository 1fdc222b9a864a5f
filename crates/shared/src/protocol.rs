use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{LocationQuery, SymptomSelection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symptoms: SymptomSelection,
    pub location: LocationQuery,
}

/// Body returned by `POST /predict`.
///
/// The logical-error shape `{ "error": "..." }` decodes into the same type with
/// every other field defaulted, so callers must check `error` first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predicted_disease: String,
    #[serde(default)]
    pub specialist: String,
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub rating: RatingValue,
    #[serde(default = "default_open_now_status")]
    pub open_now_status: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub gmaps_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

fn default_name() -> String {
    "N/A".to_string()
}

fn default_open_now_status() -> String {
    "Status unknown".to_string()
}

fn default_address() -> String {
    "Address not available".to_string()
}

fn default_phone() -> String {
    "Phone not available".to_string()
}

/// The service sends ratings as a number when known and as a label otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Score(f64),
    Label(String),
}

impl Default for RatingValue {
    fn default() -> Self {
        Self::Label("N/A".to_string())
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Either coordinate may be missing; the service sends `{}` when it has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl GeoPoint {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}

impl Doctor {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location.as_ref().and_then(GeoPoint::coordinates)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
