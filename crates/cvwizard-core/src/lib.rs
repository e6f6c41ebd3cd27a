//! cvwizard-core
//!
//! Pure domain types and storage key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the CV Wizard system.

use std::future::Future;
use std::pin::Pin;

pub mod error;
pub mod keys;
pub mod models;

/// Boxed future returned by the collaborator traits (blob store, key-value
/// store, evaluator, preview renderer) so they stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
