//! Domain models for the design case catalog.
//!
//! This module contains the core domain types: catalogued records, their
//! identifiers and drafts, and the catalog configuration.

/// Record domain model and identifiers.
pub mod record;
pub use record::{Draft, Record, RecordId};

mod config;
pub use config::Config;
