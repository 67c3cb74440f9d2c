//! # deps-ingest
//!
//! Turns "project name + version" into a stored, scored dependency set.
//!
//! [`IngestService`] drives a [`MetadataClient`](deps_client::MetadataClient)
//! through four sequential stages and hands the result to a
//! [`ProjectStore`](deps_db::ProjectStore) for reconciliation:
//!
//! 1. fetch the dependency graph and keep one key per `(ecosystem, name)`
//! 2. batch-resolve each dependency's source repository
//! 3. batch-resolve a scorecard per repository
//! 4. reconcile the project with the scored dependencies
//!
//! Any remote failure aborts the run before anything is written.

pub mod error;
pub mod pipeline;
pub mod service;

pub use error::IngestError;
pub use service::{Clock, IngestService, IngestSummary, Outcome};
