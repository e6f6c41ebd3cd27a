use serde::{Deserialize, Serialize};

use super::usage::TokenUsage;

/// What the evaluation service hands back. Only the text payload matters to
/// the pipeline; usage is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl EvaluationResponse {
    pub fn text(&self) -> Option<&str> {
        self.content.text()
    }
}

/// The evaluator may reply with the text inline or as a list of content parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    pub text: String,
}

impl MessageContent {
    /// The textual payload: the inline string, or the first part's text.
    /// Blank text counts as no payload.
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Self::Text(text) => text.as_str(),
            Self::Parts(parts) => parts.first()?.text.as_str(),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}
