//! Repository methods on [`DepsStore`](crate::service::DepsStore).

pub mod dependency;
pub mod project;
