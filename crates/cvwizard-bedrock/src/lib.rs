//! cvwizard-bedrock
//!
//! The evaluation-service seam and its Bedrock Converse implementation.

pub mod error;
pub mod evaluator;
pub mod instructions;
pub mod tokens;

pub use error::EvaluationError;
pub use evaluator::{BedrockEvaluator, Evaluator};
