//! Export/import codec for the portable catalog file
//!
//! The export format is a human-readable JSON array of records, exactly the
//! shape the storage slot uses, so an exported file round-trips losslessly
//! and can also seed a fresh catalog.

use chrono::NaiveDate;

use crate::Record;

/// Serializes the full collection to the portable export payload.
///
/// The payload is pretty-printed JSON, suitable for a file the user keeps
/// or shares. [`import_blob`] on the result reproduces the collection
/// exactly.
///
/// # Errors
///
/// Returns an error if the collection cannot be serialized.
pub fn export_blob(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Parses an export payload back into a collection.
///
/// Validation is structural and all-or-nothing: the payload must be a JSON
/// array of record-shaped objects with every required field present and
/// correctly typed. No partial recovery is attempted; the caller's
/// collection is untouched on failure.
///
/// # Errors
///
/// Returns [`InvalidFormat`] if the payload is malformed.
pub fn import_blob(payload: &str) -> Result<Vec<Record>, InvalidFormat> {
    Ok(serde_json::from_str(payload)?)
}

/// The conventional file name for an export created on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("design-cases-{date}.json")
}

/// The import payload is not a valid collection of records.
#[derive(Debug, thiserror::Error)]
#[error("invalid import payload: {0}")]
pub struct InvalidFormat(#[from] serde_json::Error);
