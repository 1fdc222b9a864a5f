//! Reads the symptom selector and location input at submission time.

use shared::{
    domain::{LocationQuery, SymptomSelection},
    error::ValidationError,
    protocol::PredictionRequest,
};

/// Read access to the page's input controls.
pub trait InputSource: Send + Sync {
    fn selected_symptoms(&self) -> Vec<String>;
    fn location_text(&self) -> String;
}

/// Fixed inputs, for hosts that already hold the values (CLI args, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticInput {
    pub symptoms: Vec<String>,
    pub location: String,
}

impl StaticInput {
    pub fn new<I, S>(symptoms: I, location: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
            location: location.into(),
        }
    }
}

impl InputSource for StaticInput {
    fn selected_symptoms(&self) -> Vec<String> {
        self.symptoms.clone()
    }

    fn location_text(&self) -> String {
        self.location.clone()
    }
}

pub fn collect(source: &dyn InputSource) -> Result<PredictionRequest, ValidationError> {
    let symptoms = SymptomSelection::new(source.selected_symptoms());
    if symptoms.is_empty() {
        return Err(ValidationError::NoSymptoms);
    }
    let location =
        LocationQuery::parse(&source.location_text()).ok_or(ValidationError::NoLocation)?;
    Ok(PredictionRequest { symptoms, location })
}

#[cfg(test)]
#[path = "tests/collector_tests.rs"]
mod tests;
