pub mod document;
pub mod evaluation;
pub mod feedback;
pub mod job;
pub mod record;
pub mod usage;
