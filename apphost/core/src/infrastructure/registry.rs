// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # In-memory registry
//!
//! Default `AppRegistry` implementation. Records live in a `DashMap`, whose
//! per-shard write guards give the at-most-one-writer-per-record guarantee:
//! `update` holds the guard for exactly the read-modify-write, so racing
//! transitions on one id serialize while other ids stay unblocked.
//!
//! Contents are process-local and volatile; a restart resets the registry.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::app::{AppId, AppRecord};
use crate::domain::registry::{AppRegistry, Mutator, RegistryError};

#[derive(Default)]
pub struct InMemoryAppRegistry {
    records: DashMap<AppId, AppRecord>,
    // Insertion order for list(); ids are appended on insert, pruned on remove.
    order: Mutex<Vec<AppId>>,
}

impl InMemoryAppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl AppRegistry for InMemoryAppRegistry {
    async fn insert(&self, record: AppRecord) -> Result<(), RegistryError> {
        let id = record.id.clone();
        match self.records.entry(id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                // Push while the shard guard is held so a racing remove
                // cannot slip between the map insert and the order append.
                let guard = slot.insert(record);
                self.order.lock().push(id);
                drop(guard);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &AppId) -> Result<Option<AppRecord>, RegistryError> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: &AppId, mutate: Mutator) -> Result<AppRecord, RegistryError> {
        let mut entry = self
            .records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        mutate(entry.value_mut())?;
        Ok(entry.value().clone())
    }

    async fn list(&self) -> Result<Vec<AppRecord>, RegistryError> {
        // Clone the order under its own lock, then resolve records without
        // holding it: lock nesting is only ever shard -> order (in insert).
        let order = self.order.lock().clone();
        Ok(order
            .iter()
            .filter_map(|id| self.records.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn remove(&self, id: &AppId) -> Result<(), RegistryError> {
        self.records
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        self.order.lock().retain(|existing| existing != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::app::AppStatus;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn record(name: &str) -> AppRecord {
        AppRecord::new(name, "localhost", 8080, HashMap::new())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = InMemoryAppRegistry::new();
        let rec = record("svc");
        let id = rec.id.clone();

        registry.insert(rec).await.unwrap();
        let fetched = registry.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.name, "svc");
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let registry = InMemoryAppRegistry::new();
        let rec = record("svc");

        registry.insert(rec.clone()).await.unwrap();
        let err = registry.insert(rec).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(_)));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let registry = InMemoryAppRegistry::new();
        let mut ids = Vec::new();
        for i in 0..8 {
            let rec = record(&format!("svc-{i}"));
            ids.push(rec.id.clone());
            registry.insert(rec).await.unwrap();
        }

        let listed = registry.list().await.unwrap();
        let listed_ids: Vec<_> = listed.into_iter().map(|r| r.id).collect();
        assert_eq!(listed_ids, ids);
    }

    #[tokio::test]
    async fn test_list_is_a_snapshot() {
        let registry = InMemoryAppRegistry::new();
        let rec = record("svc");
        let id = rec.id.clone();
        registry.insert(rec).await.unwrap();

        let snapshot = registry.list().await.unwrap();
        registry
            .update(&id, Box::new(|r| r.start()))
            .await
            .unwrap();

        assert_eq!(snapshot[0].status, AppStatus::Stopped);
        assert_eq!(
            registry.get(&id).await.unwrap().unwrap().status,
            AppStatus::Running
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let registry = InMemoryAppRegistry::new();
        let id = AppId::from("app_ghost-00000000".to_string());
        let err = registry
            .update(&id, Box::new(|r| r.start()))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejected_mutation_leaves_record_untouched() {
        let registry = InMemoryAppRegistry::new();
        let rec = record("svc");
        let id = rec.id.clone();
        registry.insert(rec).await.unwrap();

        // stop from Stopped is rejected by the state machine
        let err = registry
            .update(&id, Box::new(|r| r.stop()))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
        assert_eq!(
            registry.get(&id).await.unwrap().unwrap().status,
            AppStatus::Stopped
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = InMemoryAppRegistry::new();
        let rec = record("svc");
        let id = rec.id.clone();
        registry.insert(rec).await.unwrap();

        registry.remove(&id).await.unwrap();
        assert!(registry.get(&id).await.unwrap().is_none());
        assert!(registry.list().await.unwrap().is_empty());

        let err = registry.remove(&id).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_racing_insert_and_remove_leave_no_dangling_order_entries() {
        let registry = Arc::new(InMemoryAppRegistry::new());

        for i in 0..64 {
            let rec = record(&format!("svc-{i}"));
            let id = rec.id.clone();

            let inserter = {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.insert(rec).await })
            };
            let remover = {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                // May hit before or after the insert; NotFound is fine.
                tokio::spawn(async move { registry.remove(&id).await })
            };

            inserter.await.unwrap().unwrap();
            let _ = remover.await.unwrap();
            let _ = registry.remove(&id).await;
        }

        assert!(registry.is_empty());
        assert_eq!(registry.order.lock().len(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_serialize_per_record() {
        let registry = Arc::new(InMemoryAppRegistry::new());
        let rec = record("svc");
        let id = rec.id.clone();
        registry.insert(rec).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                registry.update(&id, Box::new(|r| r.start())).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
