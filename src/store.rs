//! The in-memory catalog and its operations
//!
//! The [`Store`] is the exclusive owner and sole mutator of the record
//! collection. It keeps records newest first and persists the whole
//! collection through its [`Slot`] before any mutation returns.

use crate::{
    storage::{LoadError, SaveError, Slot},
    Draft, Record, RecordId,
};

/// The exclusive owner of the in-memory record collection.
#[derive(Debug)]
pub struct Store {
    /// The records, newest first.
    records: Vec<Record>,
    /// The storage slot every mutation persists to.
    slot: Slot,
}

impl Store {
    /// Opens the store, loading the collection from the slot.
    ///
    /// A slot that has never been written yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read or parsed.
    /// Callers that prefer to continue with an empty collection should warn
    /// and fall back to [`Store::empty`].
    pub fn open(slot: Slot) -> Result<Self, LoadError> {
        let records = slot.load()?;
        Ok(Self { records, slot })
    }

    /// A store with no records, persisting to the given slot.
    ///
    /// This is the fallback when the slot is corrupt: the unreadable value
    /// stays on disk untouched until the next mutation overwrites it.
    #[must_use]
    pub const fn empty(slot: Slot) -> Self {
        Self {
            records: Vec::new(),
            slot,
        }
    }

    /// Creates a new record from a draft.
    ///
    /// A fresh id and today's date are assigned, the record is prepended
    /// (newest first) and the collection is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The record
    /// is not added in that case.
    pub fn create(&mut self, draft: Draft) -> Result<Record, SaveError> {
        let record = Record::new(draft);

        self.records.insert(0, record.clone());
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }

        tracing::info!("Added case {} ({})", record.title, record.id);
        Ok(record)
    }

    /// Replaces every field of the record with `id` except its id and
    /// creation date, then persists.
    ///
    /// If duplicate ids were ever present, the first match governs.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::NotFound`] if no record has the given id, or
    /// a save error if the collection cannot be persisted. The collection
    /// is left unchanged on either failure.
    pub fn update(&mut self, id: &RecordId, draft: Draft) -> Result<Record, UpdateError> {
        let position = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| UpdateError::NotFound(id.clone()))?;

        let date = self.records[position].date;
        let previous = std::mem::replace(
            &mut self.records[position],
            Record::with_id_and_date(draft, id.clone(), date),
        );
        if let Err(e) = self.persist() {
            self.records[position] = previous;
            return Err(e.into());
        }

        tracing::info!("Updated case {id}");
        Ok(self.records[position].clone())
    }

    /// Removes the record with `id`, if present, and persists.
    ///
    /// Deleting an absent id is a successful no-op, so a repeated delete of
    /// the same record cannot fail.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The record
    /// is not removed in that case.
    pub fn delete(&mut self, id: &RecordId) -> Result<bool, SaveError> {
        let Some(position) = self.records.iter().position(|r| &r.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(position);
        if let Err(e) = self.persist() {
            self.records.insert(position, removed);
            return Err(e);
        }

        tracing::info!("Deleted case {id}");
        Ok(true)
    }

    /// Replaces the entire collection with the given records, verbatim, and
    /// persists.
    ///
    /// Used by import. The records are taken as-is; the transfer codec is
    /// responsible for validating them first.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The previous
    /// collection is kept in that case.
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<(), SaveError> {
        let previous = std::mem::replace(&mut self.records, records);
        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }

        tracing::info!("Replaced catalog with {} cases", self.records.len());
        Ok(())
    }

    /// The full collection, newest first.
    #[must_use]
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// The records matching `filter`, in stored order.
    #[must_use]
    pub fn filter(&self, filter: &Filter) -> Vec<&Record> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// The categories present in the collection, deduplicated, in
    /// first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(record.category.as_str());
            }
        }
        seen
    }

    /// All tags present across the collection, deduplicated, in first-seen
    /// order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for tag in self.records.iter().flat_map(|r| &r.tags) {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag.as_str());
            }
        }
        seen
    }

    /// The number of records in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<(), SaveError> {
        self.slot.save(&self.records)
    }
}

/// Failure to update a record.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// No record with the given id exists.
    #[error("no case with id {0}")]
    NotFound(RecordId),

    /// The collection could not be persisted.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Predicate options for a filtered view of the collection.
///
/// Both constraints apply simultaneously. A constraint that is `None` or
/// the sentinel `"all"` matches every record, so an empty filter is the
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Keep only records whose category equals this value exactly.
    pub category: Option<String>,
    /// Keep only records carrying this tag.
    pub tag: Option<String>,
}

impl Filter {
    const ALL: &'static str = "all";

    /// Whether a record passes both constraints.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|c| c == Self::ALL || record.category == c);
        let tag_match = self
            .tag
            .as_deref()
            .is_none_or(|t| t == Self::ALL || record.tags.iter().any(|tag| tag == t));

        category_match && tag_match
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup_store() -> (TempDir, Store) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let store = Store::open(Slot::in_dir(tmp.path())).unwrap();
        (tmp, store)
    }

    fn draft(title: &str, category: &str, tags: &[&str]) -> Draft {
        Draft {
            title: title.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            rating: 4,
            ..Draft::default()
        }
    }

    #[test]
    fn create_prepends_and_assigns_fresh_identity() {
        let (_tmp, mut store) = setup_store();

        let first = store
            .create(draft("Card UI", "UI设计", &["minimal"]))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0], first);

        let second = store.create(draft("Poster", "排版", &[])).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0], second);
        assert_eq!(store.list()[1], first);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_persists_immediately() {
        let (tmp, mut store) = setup_store();
        let record = store.create(draft("Card UI", "UI设计", &[])).unwrap();

        let reopened = Store::open(Slot::in_dir(tmp.path())).unwrap();
        assert_eq!(reopened.list(), &[record]);
    }

    #[test]
    fn update_preserves_id_and_date_and_replaces_the_rest() {
        let (_tmp, mut store) = setup_store();
        let original = store
            .create(draft("Card UI", "UI设计", &["minimal"]))
            .unwrap();

        let updated = store
            .update(&original.id, draft("Card UI v2", "网页设计", &["grid"]))
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.title, "Card UI v2");
        assert_eq!(updated.category, "网页设计");
        assert_eq!(updated.tags, vec!["grid".to_string()]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0], updated);
    }

    #[test]
    fn update_unknown_id_fails_and_leaves_collection_unchanged() {
        let (_tmp, mut store) = setup_store();
        let record = store.create(draft("Card UI", "UI设计", &[])).unwrap();

        let error = store
            .update(&RecordId::from("missing"), draft("X", "Y", &[]))
            .unwrap_err();

        assert!(matches!(error, UpdateError::NotFound(_)));
        assert_eq!(store.list(), &[record]);
    }

    #[test]
    fn delete_removes_exactly_the_named_record() {
        let (_tmp, mut store) = setup_store();
        let first = store.create(draft("Card UI", "UI设计", &[])).unwrap();
        let second = store.create(draft("Poster", "排版", &[])).unwrap();

        assert!(store.delete(&second.id).unwrap());
        assert_eq!(store.list(), &[first]);
    }

    #[test]
    fn delete_is_idempotent() {
        let (tmp, mut store) = setup_store();
        let record = store.create(draft("Card UI", "UI设计", &[])).unwrap();
        store.create(draft("Poster", "排版", &[])).unwrap();
        assert!(store.delete(&record.id).unwrap());

        let before = std::fs::read(tmp.path().join(crate::storage::SLOT_FILE)).unwrap();
        assert!(!store.delete(&record.id).unwrap());
        let after = std::fs::read(tmp.path().join(crate::storage::SLOT_FILE)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(before, after);
    }

    #[test]
    fn filter_by_category_preserves_relative_order() {
        let (_tmp, mut store) = setup_store();
        let a = store.create(draft("A", "UI设计", &[])).unwrap();
        store.create(draft("B", "排版", &[])).unwrap();
        let c = store.create(draft("C", "UI设计", &[])).unwrap();

        let filtered = store.filter(&Filter {
            category: Some("UI设计".to_string()),
            tag: None,
        });

        assert_eq!(filtered, vec![&c, &a]);
    }

    #[test]
    fn filter_applies_category_and_tag_together() {
        let (_tmp, mut store) = setup_store();
        store.create(draft("A", "UI设计", &["minimal"])).unwrap();
        store.create(draft("B", "UI设计", &["gradient"])).unwrap();
        let c = store
            .create(draft("C", "UI设计", &["minimal", "gradient"]))
            .unwrap();
        store.create(draft("D", "排版", &["minimal"])).unwrap();

        let filtered = store.filter(&Filter {
            category: Some("UI设计".to_string()),
            tag: Some("gradient".to_string()),
        });

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0], &c);
    }

    #[test]
    fn all_sentinel_is_the_identity_filter() {
        let (_tmp, mut store) = setup_store();
        store.create(draft("A", "UI设计", &["minimal"])).unwrap();
        store.create(draft("B", "排版", &[])).unwrap();

        let filtered = store.filter(&Filter {
            category: Some("all".to_string()),
            tag: Some("all".to_string()),
        });

        assert_eq!(filtered, store.list().iter().collect::<Vec<_>>());
    }

    #[test]
    fn empty_filter_is_the_identity() {
        let (_tmp, mut store) = setup_store();
        store.create(draft("A", "UI设计", &[])).unwrap();

        assert_eq!(store.filter(&Filter::default()).len(), store.len());
    }

    #[test]
    fn categories_and_tags_deduplicate_in_first_seen_order() {
        let (_tmp, mut store) = setup_store();
        store.create(draft("A", "UI设计", &["minimal"])).unwrap();
        store
            .create(draft("B", "排版", &["grid", "minimal"]))
            .unwrap();
        store.create(draft("C", "UI设计", &["grid"])).unwrap();

        // Newest first, so C is seen before B before A.
        assert_eq!(store.categories(), vec!["UI设计", "排版"]);
        assert_eq!(store.tags(), vec!["grid", "minimal"]);
    }

    #[test]
    fn replace_all_takes_records_verbatim() {
        let (tmp, mut store) = setup_store();
        store.create(draft("Old", "UI设计", &[])).unwrap();

        let replacement = vec![
            Record::new(draft("New A", "插画", &["ink"])),
            Record::new(draft("New B", "图标", &[])),
        ];
        store.replace_all(replacement.clone()).unwrap();

        assert_eq!(store.list(), replacement);

        let reopened = Store::open(Slot::in_dir(tmp.path())).unwrap();
        assert_eq!(reopened.list(), replacement);
    }

    #[test]
    fn open_on_corrupt_slot_fails_and_empty_fallback_works() {
        let tmp = TempDir::new().unwrap();
        let slot = Slot::in_dir(tmp.path());
        std::fs::write(slot.path(), "{not valid").unwrap();

        assert!(matches!(
            Store::open(slot.clone()),
            Err(LoadError::Corrupt { .. })
        ));

        let store = Store::empty(slot);
        assert!(store.is_empty());
    }

    #[test]
    fn full_session_scenario() {
        let (_tmp, mut store) = setup_store();
        assert!(store.is_empty());

        let first = store
            .create(draft("Card UI", "UI设计", &["minimal"]))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "Card UI");

        let second = store.create(draft("Poster", "排版", &[])).unwrap();
        assert_eq!(store.list()[0], second);

        assert!(store.delete(&second.id).unwrap());
        assert_eq!(store.list(), &[first]);
    }
}
