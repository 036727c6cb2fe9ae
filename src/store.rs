//!
//! Persistence collaborators: the client aggregate store and the
//! deduplicated identifier store, plus an in-memory implementation of both.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::AclError;
use crate::primitives::{Client, ClientId, SubjectId};

/// Loads and saves client aggregates.
pub trait ClientStore: Send + Sync {
    fn client(&self, id: &ClientId) -> Result<Option<Client>, AclError>;

    /// Saves the whole aggregate.
    ///
    /// Fails with [`AclError::ConcurrentModification`] when the stored
    /// version is no longer the one `client` was loaded at.
    fn save_client(&self, client: &Client) -> Result<(), AclError>;
}

/// Rows of every non-local subject identifier ever referenced by an access right.
pub trait IdentifierStore: Send + Sync {
    fn identifiers(&self) -> Result<Vec<SubjectId>, AclError>;

    /// Returns the stored form of every identifier in `ids`, persisting the
    /// ones not stored yet.
    ///
    /// Lookup and insert are one atomic step, so concurrent callers never
    /// store the same identifier twice.
    fn get_or_persist(&self, ids: &BTreeSet<SubjectId>) -> Result<BTreeSet<SubjectId>, AclError>;
}

/// A persisted identifier row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdentifierRow {
    pub row_id: Uuid,
    pub subject_id: SubjectId,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    clients: RwLock<HashMap<ClientId, Client>>,
    identifiers: RwLock<Vec<IdentifierRow>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or overwrites a client without a version check.
    pub fn insert_client(&self, client: Client) {
        self.clients.write().insert(client.id.clone(), client);
    }

    pub fn identifier_rows(&self) -> Vec<IdentifierRow> {
        self.identifiers.read().clone()
    }
}

impl ClientStore for InMemoryStore {
    fn client(&self, id: &ClientId) -> Result<Option<Client>, AclError> {
        Ok(self.clients.read().get(id).cloned())
    }

    fn save_client(&self, client: &Client) -> Result<(), AclError> {
        let mut clients = self.clients.write();
        if let Some(stored) = clients.get(&client.id) {
            if stored.version != client.version {
                tracing::warn!(client = %client.id, stored = stored.version, loaded = client.version, "stale client save rejected");
                return Err(AclError::ConcurrentModification(client.id.clone()));
            }
        }
        let mut saved = client.clone();
        saved.version += 1;
        clients.insert(saved.id.clone(), saved);
        Ok(())
    }
}

impl IdentifierStore for InMemoryStore {
    fn identifiers(&self) -> Result<Vec<SubjectId>, AclError> {
        Ok(self.identifiers.read().iter().map(|row| row.subject_id.clone()).collect())
    }

    fn get_or_persist(&self, ids: &BTreeSet<SubjectId>) -> Result<BTreeSet<SubjectId>, AclError> {
        let mut rows = self.identifiers.write();
        let mut stored: BTreeSet<SubjectId> =
            rows.iter().filter(|row| ids.contains(&row.subject_id)).map(|row| row.subject_id.clone()).collect();
        let fresh: Vec<SubjectId> = ids.iter().filter(|id| !stored.contains(*id)).cloned().collect();
        if !fresh.is_empty() {
            tracing::debug!(existing = stored.len(), persisted = fresh.len(), "identifiers persisted");
        }
        rows.extend(fresh.iter().map(|id| IdentifierRow { row_id: Uuid::new_v4(), subject_id: id.clone() }));
        stored.extend(fresh);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::GlobalGroupId;

    #[test]
    fn test_save_bumps_version() {
        let store = InMemoryStore::new();
        let id = ClientId::subsystem("EE", "GOV", "1", "SUB");
        store.insert_client(Client::new(id.clone()));

        let loaded = store.client(&id).unwrap().unwrap();
        store.save_client(&loaded).unwrap();
        assert_eq!(store.client(&id).unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_stale_save_is_rejected() {
        let store = InMemoryStore::new();
        let id = ClientId::subsystem("EE", "GOV", "1", "SUB");
        store.insert_client(Client::new(id.clone()));

        let first = store.client(&id).unwrap().unwrap();
        let second = store.client(&id).unwrap().unwrap();
        store.save_client(&first).unwrap();
        assert_eq!(store.save_client(&second), Err(AclError::ConcurrentModification(id)));
    }

    #[test]
    fn test_unknown_client_loads_as_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.client(&ClientId::member("EE", "GOV", "9")).unwrap(), None);
    }

    #[test]
    fn test_persisted_rows_get_distinct_row_ids() {
        let store = InMemoryStore::new();
        let ids: BTreeSet<SubjectId> =
            [SubjectId::from(GlobalGroupId::new("EE", "a")), SubjectId::from(GlobalGroupId::new("EE", "b"))].into_iter().collect();
        assert_eq!(store.get_or_persist(&ids).unwrap(), ids);
        let rows = store.identifier_rows();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].row_id, rows[1].row_id);
        assert_eq!(store.identifiers().unwrap().len(), 2);
    }

    #[test]
    fn test_get_or_persist_skips_stored_identifiers() {
        let store = InMemoryStore::new();
        let a = SubjectId::from(GlobalGroupId::new("EE", "a"));
        let b = SubjectId::from(GlobalGroupId::new("EE", "b"));
        store.get_or_persist(&[a.clone()].into_iter().collect()).unwrap();
        let both: BTreeSet<SubjectId> = [a, b].into_iter().collect();
        assert_eq!(store.get_or_persist(&both).unwrap(), both);
        assert_eq!(store.get_or_persist(&both).unwrap(), both);
        assert_eq!(store.identifier_rows().len(), 2);
    }

    #[test]
    fn test_parallel_get_or_persist_stores_once() {
        let store = InMemoryStore::new();
        let ids: BTreeSet<SubjectId> = [SubjectId::from(GlobalGroupId::new("EE", "a"))].into_iter().collect();
        let barrier = std::sync::Barrier::new(8);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    barrier.wait();
                    store.get_or_persist(&ids).unwrap();
                });
            }
        });
        assert_eq!(store.identifier_rows().len(), 1);
    }
}
