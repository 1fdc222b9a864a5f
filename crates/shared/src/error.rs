use thiserror::Error;

/// Input problems caught before any request leaves the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select at least one symptom.")]
    NoSymptoms,
    #[error("Please enter your location.")]
    NoLocation,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSymptoms => "no_symptoms",
            Self::NoLocation => "no_location",
        }
    }
}
