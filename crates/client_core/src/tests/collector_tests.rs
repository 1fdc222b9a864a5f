use super::*;

#[test]
fn empty_selection_is_rejected_before_location() {
    let input = StaticInput::new(Vec::<String>::new(), "");
    assert_eq!(collect(&input), Err(ValidationError::NoSymptoms));
}

#[test]
fn blank_only_selection_counts_as_empty() {
    let input = StaticInput::new(["", "   "], "Springfield");
    assert_eq!(collect(&input), Err(ValidationError::NoSymptoms));
}

#[test]
fn whitespace_location_is_rejected() {
    let input = StaticInput::new(["fever"], " \t\n ");
    assert_eq!(collect(&input), Err(ValidationError::NoLocation));
}

#[test]
fn valid_input_builds_trimmed_request() {
    let input = StaticInput::new(["fever", "cough", "fever"], "  Springfield ");
    let request = collect(&input).expect("valid request");

    assert_eq!(request.symptoms.as_slice(), ["fever", "cough"]);
    assert_eq!(request.location.as_str(), "Springfield");
}

#[test]
fn validation_messages_match_page_copy() {
    assert_eq!(
        ValidationError::NoSymptoms.to_string(),
        "Please select at least one symptom."
    );
    assert_eq!(
        ValidationError::NoLocation.to_string(),
        "Please enter your location."
    );
}
