//! Local catalog for curated design references
//!
//! Design cases are kept in memory, newest first, and persisted as a whole
//! to a single JSON slot on every mutation.

pub mod domain;
pub use domain::{Config, Draft, Record, RecordId};

/// The in-memory collection and its operations.
pub mod store;
pub use store::{Filter, Store, UpdateError};

/// Persistence of the collection to a local storage slot.
pub mod storage;
pub use storage::{LoadError, SaveError, Slot};

/// Export/import codec for the portable catalog file.
pub mod transfer;
pub use transfer::InvalidFormat;
