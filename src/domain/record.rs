use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalogued design reference.
///
/// Records are stored and exported with camelCase field names so that
/// catalog files exchanged with other tools keep the conventional shape.
/// The identifier and creation date are assigned once, when the record is
/// created, and survive every subsequent update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique, stable identifier of the record.
    pub id: RecordId,
    /// Display title.
    pub title: String,
    /// Category, conventionally drawn from the suggested set in
    /// [`Config`](crate::Config). Membership is not enforced.
    pub category: String,
    /// Ordered tags. Duplicates are preserved.
    pub tags: Vec<String>,
    /// Free-form description. May be empty.
    pub description: String,
    /// Link to the reference imagery. Not validated as a URL.
    pub image_url: String,
    /// Link to the original source. Not validated as a URL.
    pub source_url: String,
    /// Date the record was created.
    pub date: NaiveDate,
    /// Free-form personal notes. May be empty.
    pub notes: String,
    /// Rating, 0 to 5 by convention. Opaque to the store.
    pub rating: u8,
    /// Ordered list of learning points.
    pub learning_points: Vec<String>,
}

impl Record {
    /// Construct a new [`Record`] from a draft.
    ///
    /// A fresh identifier is generated and the creation date is set to
    /// today.
    #[must_use]
    pub fn new(draft: Draft) -> Self {
        Self::with_id_and_date(draft, RecordId::generate(), Utc::now().date_naive())
    }

    pub(crate) fn with_id_and_date(draft: Draft, id: RecordId, date: NaiveDate) -> Self {
        Self {
            id,
            title: draft.title,
            category: draft.category,
            tags: draft.tags,
            description: draft.description,
            image_url: draft.image_url,
            source_url: draft.source_url,
            date,
            notes: draft.notes,
            rating: draft.rating,
            learning_points: draft.learning_points,
        }
    }

    /// The field values of this record, without its identity.
    ///
    /// Useful for pre-filling an edit form before a whole-record update.
    #[must_use]
    pub fn draft(&self) -> Draft {
        Draft {
            title: self.title.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            source_url: self.source_url.clone(),
            notes: self.notes.clone(),
            rating: self.rating,
            learning_points: self.learning_points.clone(),
        }
    }
}

/// The caller-supplied field values of a record, excluding the
/// store-assigned identifier and creation date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Display title.
    pub title: String,
    /// Category string.
    pub category: String,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Free-form description.
    pub description: String,
    /// Link to the reference imagery.
    pub image_url: String,
    /// Link to the original source.
    pub source_url: String,
    /// Free-form personal notes.
    pub notes: String,
    /// Rating, 0 to 5 by convention.
    pub rating: u8,
    /// Ordered list of learning points.
    pub learning_points: Vec<String>,
}

/// Opaque record identifier.
///
/// Generated identifiers are random UUIDs, but any string is accepted when
/// loading or importing a catalog produced elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh, collision-free identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
