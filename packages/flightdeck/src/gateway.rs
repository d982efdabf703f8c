use crate::engine::types::{FieldValue, Record};
use crate::store::RecordStore;
use smol_str::SmolStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

#[derive(Debug, Error, PartialEq)]
pub enum GatewayError {
    /// Required fields missing or empty; names every offender. The store is
    /// untouched; there is no partial write.
    #[error("missing required fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },
    #[error("flight plan {id} not found")]
    NotFound { id: u64 },
    /// A mutation is already in flight against this store.
    #[error("mutation already in flight")]
    Busy,
}

/// Wholesale replacement payload for a flight plan. `id` is never part of
/// the draft; create assigns it, update preserves it.
#[derive(Debug, Clone, Default)]
pub struct PlanDraft {
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

impl PlanDraft {
    pub fn new(name: &str, description: &str, is_active: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            is_active,
        }
    }

    fn validate(&self) -> Result<(), GatewayError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Validation { fields: missing })
        }
    }

    fn into_record(self, id: u64) -> Record {
        let mut record = Record::new(id);
        record
            .set("name", FieldValue::Str(SmolStr::new(&self.name)))
            .set("description", FieldValue::Str(SmolStr::new(&self.description)))
            .set("isActive", FieldValue::Bool(self.is_active));
        record
    }
}

/// CRUD gateway over the flight-plan store. Every accepted mutation is an
/// async task with simulated latency; the store mutex is held across the
/// suspension, so a second submission observes `Busy` until the first
/// settles (single in-flight mutation per store). Validation happens before
/// anything is locked or slept on. Deletion confirmation is the caller's
/// gate; the gateway itself is safe to drive programmatically.
pub struct PlanGateway {
    store: Mutex<RecordStore>,
    latency: Duration,
}

impl PlanGateway {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Mutex::new(store),
            latency: Duration::from_millis(500),
        }
    }

    /// Zero-latency gateway for tests and scripted use.
    pub fn with_latency(store: RecordStore, latency: Duration) -> Self {
        Self {
            store: Mutex::new(store),
            latency,
        }
    }

    /// True while a mutation holds the store.
    pub fn is_pending(&self) -> bool {
        self.store.try_lock().is_err()
    }

    /// Current store contents; waits out any in-flight mutation.
    pub async fn snapshot(&self) -> Vec<Record> {
        self.store.lock().await.snapshot().to_vec()
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: PlanDraft) -> Result<Record, GatewayError> {
        draft.validate()?;
        let mut store = self.store.try_lock().map_err(|_| GatewayError::Busy)?;
        tokio::time::sleep(self.latency).await;

        let id = store.allocate_id();
        let record = draft.into_record(id);
        let mut next = store.snapshot().to_vec();
        next.push(record.clone());
        store.replace(next);
        Ok(record)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: u64, draft: PlanDraft) -> Result<Record, GatewayError> {
        draft.validate()?;
        let mut store = self.store.try_lock().map_err(|_| GatewayError::Busy)?;
        if !store.contains(id) {
            return Err(GatewayError::NotFound { id });
        }
        tokio::time::sleep(self.latency).await;

        let record = draft.into_record(id);
        let next = store
            .snapshot()
            .iter()
            .map(|r| if r.id == id { record.clone() } else { r.clone() })
            .collect();
        store.replace(next);
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), GatewayError> {
        let mut store = self.store.try_lock().map_err(|_| GatewayError::Busy)?;
        if !store.contains(id) {
            return Err(GatewayError::NotFound { id });
        }
        tokio::time::sleep(self.latency).await;

        let next = store
            .snapshot()
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        store.replace(next);
        Ok(())
    }
}
