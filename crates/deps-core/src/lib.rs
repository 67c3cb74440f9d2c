//! # deps-core
//!
//! Core types, dependency diffing, and error taxonomy for depsmanager.
//!
//! This crate provides the foundational types shared across all depsmanager crates:
//! - Entity structs for projects and their scored dependencies
//! - The diff engine used to reconcile a stored dependency set with a fresh one
//! - The error taxonomy every crate error classifies into

pub mod diff;
pub mod entities;
pub mod errors;
