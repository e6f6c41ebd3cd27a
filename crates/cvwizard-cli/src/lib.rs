//! cvwizard-cli
//!
//! Command-line surface over the submission pipeline.

pub mod commands;
pub mod config;
pub mod runtime;
