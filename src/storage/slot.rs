//! A file backed storage slot for the catalog
//!
//! The [`Slot`] reads and writes the whole collection as one JSON value
//! under a fixed file name. There are no partial updates; the store saves
//! the full collection after every mutation.

use std::{
    io,
    path::{Path, PathBuf},
};

use crate::Record;

/// File name of the storage slot inside the catalog root.
pub const SLOT_FILE: &str = "design-cases.json";

/// A single, fixed storage slot holding the serialized collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    path: PathBuf,
}

impl Slot {
    /// A slot at an explicit file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The canonical slot inside a catalog root directory.
    #[must_use]
    pub fn in_dir(root: &Path) -> Self {
        Self::new(root.join(SLOT_FILE))
    }

    /// The path of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the collection from the slot.
    ///
    /// A slot that has never been written is an empty collection, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file exists but cannot be read, and
    /// [`LoadError::Corrupt`] if its content is not a valid collection. The
    /// two cases are deliberately distinct: a corrupt slot should be
    /// surfaced to the user rather than silently discarded.
    pub fn load(&self) -> Result<Vec<Record>, LoadError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LoadError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| LoadError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Writes the full collection to the slot, replacing any previous
    /// value.
    ///
    /// The write is atomic: the collection is serialized to a temporary
    /// file next to the slot and renamed over it, so a crash mid-write
    /// leaves the previous value intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self, records: &[Record]) -> Result<(), SaveError> {
        let content = serde_json::to_string_pretty(records)?;

        let tmp = self.path.with_extension("json.tmp");
        let io = |source| SaveError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::write(&tmp, content).map_err(io)?;
        std::fs::rename(&tmp, &self.path).map_err(io)?;

        tracing::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Failure to read the collection from the slot.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The slot file exists but could not be read.
    #[error("failed to read catalog at {path}")]
    Io {
        /// Path of the slot file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The slot file exists but does not hold a valid collection.
    #[error("stored catalog at {path} is corrupt")]
    Corrupt {
        /// Path of the slot file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Failure to write the collection to the slot.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The collection could not be serialized.
    #[error("failed to serialize catalog")]
    Serialize(#[from] serde_json::Error),

    /// The slot file could not be written.
    #[error("failed to write catalog at {path}")]
    Io {
        /// Path of the slot file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
