use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Free-text description of the position a document is evaluated against.
///
/// Every field is optional. Blank strings are normalized to `None` so a
/// record never carries an empty company name or job title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobContext {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
}

impl JobContext {
    pub fn new(
        company_name: Option<String>,
        job_title: Option<String>,
        job_description: Option<String>,
    ) -> Self {
        Self {
            company_name: non_blank(company_name),
            job_title: non_blank(job_title),
            job_description: non_blank(job_description),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
