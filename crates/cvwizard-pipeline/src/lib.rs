//! cvwizard-pipeline
//!
//! Drives a submitted document through storage, preview derivation and
//! evaluation into a persisted [`Record`](cvwizard_core::models::record::Record),
//! and reads records back for display.

pub mod context;
pub mod error;
pub mod listing;
pub mod orchestrator;
pub mod preview;
pub mod status;
pub mod wipe;

pub use context::PipelineContext;
pub use error::PipelineError;
pub use listing::{Catalog, LoadedRecord};
pub use orchestrator::Pipeline;
pub use status::{Stage, Status};
