//! Login gate backed by a durable key-value store. This is the mock
//! credential check of the admin UI: a plaintext pair under a fixed key,
//! compared on submit. NOT a security boundary; do not treat a match as
//! real authentication.

use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::instrument;

const CREDENTIALS: TableDefinition<&str, &str> = TableDefinition::new("credentials");
const ADMIN_KEY: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no stored credentials")]
    Missing,
    #[error("stored credential record is corrupt")]
    Corrupt,
    #[error(transparent)]
    Storage(#[from] redb::Error),
}

#[derive(Serialize, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    pub fn open(path: &Path) -> Result<Self, AuthError> {
        let db = Database::create(path).map_err(redb::Error::from)?;
        Ok(Self { db })
    }

    #[instrument(skip_all)]
    pub fn save(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let payload = serde_json::to_string(&Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|_| AuthError::Corrupt)?;

        let txn = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = txn.open_table(CREDENTIALS).map_err(redb::Error::from)?;
            table
                .insert(ADMIN_KEY, payload.as_str())
                .map_err(redb::Error::from)?;
        }
        txn.commit().map_err(redb::Error::from)?;
        Ok(())
    }

    /// Compare a submitted pair against the stored one. `Ok(false)` is a
    /// wrong pair; `Err(Missing)` means nothing was ever saved.
    #[instrument(skip_all)]
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = match txn.open_table(CREDENTIALS) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Err(AuthError::Missing),
            Err(e) => return Err(redb::Error::from(e).into()),
        };
        let guard = table.get(ADMIN_KEY).map_err(redb::Error::from)?;
        let Some(guard) = guard else {
            return Err(AuthError::Missing);
        };
        let stored: Credentials =
            serde_json::from_str(guard.value()).map_err(|_| AuthError::Corrupt)?;
        Ok(stored.username == username && stored.password == password)
    }
}
