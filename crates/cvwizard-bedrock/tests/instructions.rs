use cvwizard_bedrock::evaluator::sanitize_document_name;
use cvwizard_bedrock::instructions::{RESPONSE_FORMAT, prepare_instructions};
use cvwizard_core::models::job::JobContext;

fn job(title: Option<&str>, description: Option<&str>) -> JobContext {
    JobContext::new(
        Some("Acme".to_string()),
        title.map(str::to_string),
        description.map(str::to_string),
    )
}

#[test]
fn includes_job_details() {
    let text = prepare_instructions(&job(Some("Backend Engineer"), Some("Rust, Postgres")));
    assert!(text.contains("The company the user is applying to is: Acme"));
    assert!(text.contains("The job title is: Backend Engineer"));
    assert!(text.contains("The job description is: Rust, Postgres"));
    assert!(!text.contains("No job details were given"));
}

#[test]
fn missing_job_details_are_called_out() {
    let text = prepare_instructions(&JobContext::default());
    assert!(text.contains("No job details were given"));
    assert!(!text.contains("The job title is"));
}

#[test]
fn ends_with_response_format_and_json_only_request() {
    let text = prepare_instructions(&job(Some("Designer"), None));
    assert!(text.contains(RESPONSE_FORMAT));
    assert!(text.trim_end().ends_with("return only the JSON object."));
}

#[test]
fn response_format_names_every_feedback_field() {
    for field in [
        "\"overallScore\"",
        "\"ATS\"",
        "\"toneAndStyle\"",
        "\"content\"",
        "\"structure\"",
        "\"skills\"",
        "\"explanation\"",
        "\"good\" | \"improve\"",
    ] {
        assert!(RESPONSE_FORMAT.contains(field), "missing {field}");
    }
}

#[test]
fn document_names_are_bedrock_safe() {
    assert_eq!(sanitize_document_name("My_CV (final)"), "My CV (final)");
    assert_eq!(sanitize_document_name("a..b__c"), "a b c");
    assert_eq!(sanitize_document_name("___"), "document");
}
