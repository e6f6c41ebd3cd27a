use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{FeedbackError, ScoreOutOfRange};

/// An integer score in `0..=100`.
///
/// Deserialization only accepts JSON integers; fractional, negative and
/// out-of-range values are rejected rather than clamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(try_from = "i64", into = "u8")]
#[ts(export)]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, ScoreOutOfRange> {
        Self::try_from(i64::from(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/100", self.0)
    }
}

/// Classification of a tip. Exactly two tags exist on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TipKind {
    #[serde(rename = "good")]
    Positive,
    #[serde(rename = "improve")]
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct CategoryTip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct AtsTip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
}

/// One scored category (tone & style, content, structure, skills).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Category {
    pub score: Score,
    pub tips: Vec<CategoryTip>,
}

/// Applicant-tracking-system compatibility block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct Ats {
    pub score: Score,
    pub tips: Vec<AtsTip>,
}

/// The structured critique returned by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct Feedback {
    pub overall_score: Score,
    #[serde(rename = "ATS")]
    pub ats: Ats,
    pub tone_and_style: Category,
    pub content: Category,
    pub structure: Category,
    pub skills: Category,
}

impl Feedback {
    /// Strictly parse evaluator text into a `Feedback`.
    ///
    /// Only surrounding whitespace is tolerated. Missing fields, wrong types,
    /// unknown fields, unknown tip tags and out-of-range scores all fail.
    pub fn parse(text: &str) -> Result<Self, FeedbackError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FeedbackError::Empty);
        }
        Ok(serde_json::from_str(trimmed)?)
    }
}
