//! Instruction text sent alongside the document.
//!
//! The response format block mirrors the wire shape of
//! [`Feedback`](cvwizard_core::models::feedback::Feedback) exactly; the
//! pipeline parses the reply strictly, so any drift here shows up as parse
//! failures.

use std::fmt::Write;

use cvwizard_core::models::job::JobContext;

pub const RESPONSE_FORMAT: &str = r#"{
  "overallScore": <integer 0-100>,
  "ATS": {
    "score": <integer 0-100>,
    "tips": [{ "type": "good" | "improve", "tip": "<short headline>" }]
  },
  "toneAndStyle": {
    "score": <integer 0-100>,
    "tips": [{ "type": "good" | "improve", "tip": "<short headline>", "explanation": "<detailed explanation>" }]
  },
  "content": {
    "score": <integer 0-100>,
    "tips": [{ "type": "good" | "improve", "tip": "<short headline>", "explanation": "<detailed explanation>" }]
  },
  "structure": {
    "score": <integer 0-100>,
    "tips": [{ "type": "good" | "improve", "tip": "<short headline>", "explanation": "<detailed explanation>" }]
  },
  "skills": {
    "score": <integer 0-100>,
    "tips": [{ "type": "good" | "improve", "tip": "<short headline>", "explanation": "<detailed explanation>" }]
  }
}"#;

/// Render the evaluation instructions for a job.
pub fn prepare_instructions(job: &JobContext) -> String {
    let mut out = String::from(
        "You are an expert in ATS (Applicant Tracking System) and resume analysis.\n\
         Please analyze and rate this resume and suggest how to improve it.\n\
         The rating can be low if the resume is bad.\n\
         Be thorough and detailed. Don't be afraid to point out any mistakes or areas for improvement.\n\
         If there is a lot to improve, don't hesitate to give low scores. This is to help the user to improve their resume.\n",
    );

    if let Some(company) = &job.company_name {
        let _ = writeln!(out, "The company the user is applying to is: {company}");
    }
    if let Some(title) = &job.job_title {
        let _ = writeln!(out, "The job title is: {title}");
    }
    if let Some(description) = &job.job_description {
        let _ = writeln!(out, "The job description is: {description}");
    }
    if job.job_title.is_none() && job.job_description.is_none() {
        out.push_str("No job details were given; evaluate the resume on its own merits.\n");
    }

    out.push_str(
        "Scores are whole numbers from 0 to 100. Give 3-4 tips per category.\n\
         Provide the feedback using the following format:\n",
    );
    out.push_str(RESPONSE_FORMAT);
    out.push_str(
        "\nReturn the analysis as a JSON object, without any other text and without backticks.\n\
         Do not include any other text or comments; return only the JSON object.",
    );
    out
}
