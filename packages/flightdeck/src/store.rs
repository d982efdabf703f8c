use crate::engine::types::Record;

/// Ordered in-memory collection backing one screen. Populated once from a
/// provider at mount; only the mutation gateway writes to it afterwards, and
/// it does so by whole-collection replacement.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    // High-water mark: ids stay monotonic and are never reused, even after
    // interleaved deletes.
    next_id: u64,
}

impl RecordStore {
    pub fn from_records(records: Vec<Record>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// Initialize from an injected provider, called exactly once.
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: FnOnce() -> Vec<Record>,
    {
        Self::from_records(provider())
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Claim the next id. Max-plus-one at load time, strictly increasing
    /// afterwards.
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Atomic whole-collection swap; readers see either the old or the new
    /// set, never a half-applied write.
    pub(crate) fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
    }
}

#[cfg(test)]
mod record_store_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_store_allocates_from_one() {
        let mut store = RecordStore::from_records(vec![]);
        assert_eq!(store.allocate_id(), 1);
        assert_eq!(store.allocate_id(), 2);
    }

    #[test]
    fn test_allocation_starts_at_max_plus_one() {
        let records = vec![
            Record::from_value(json!({"id": 1, "name": "Flight Alpha"})),
            Record::from_value(json!({"id": 4, "name": "Flight Beta"})),
        ];
        let mut store = RecordStore::from_records(records);
        assert_eq!(store.allocate_id(), 5);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = RecordStore::from_records(vec![]);
        let a = store.allocate_id();
        let b = store.allocate_id();
        store.replace(vec![Record::new(a)]);
        // b was deleted (never re-added); the next id still moves past it.
        assert_eq!(store.allocate_id(), b + 1);
    }

    #[test]
    fn test_snapshot_reflects_replace() {
        let mut store = RecordStore::from_records(vec![Record::new(1)]);
        store.replace(vec![Record::new(1), Record::new(2)]);
        assert_eq!(store.len(), 2);
        assert!(store.contains(2));
        assert!(!store.contains(3));
    }
}
