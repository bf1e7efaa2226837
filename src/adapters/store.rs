//! On-device entity store boundary
//!
//! The sync pipeline saves decoded entities through [`EntityStore`]. The real
//! store lives in the host application; [`InMemoryStore`] backs the command
//! line tool and tests.

use crate::domain::{Identified, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Keyed storage for one entity type
#[async_trait]
pub trait EntityStore<T>: Send + Sync
where
    T: Identified + Clone + Send + Sync + 'static,
{
    /// Saves entities, replacing any stored under the same uuid
    ///
    /// # Returns
    ///
    /// The number of entities written
    ///
    /// # Errors
    ///
    /// Returns a store error if the write fails.
    async fn save(&self, entities: Vec<T>) -> Result<usize>;

    /// Loads one entity by uuid
    async fn get(&self, uuid: &str) -> Result<Option<T>>;

    /// Removes one entity by uuid
    ///
    /// # Returns
    ///
    /// `true` when an entity was removed
    async fn delete(&self, uuid: &str) -> Result<bool>;

    /// Number of stored entities
    async fn count(&self) -> Result<usize>;
}

/// Store held in process memory
#[derive(Debug)]
pub struct InMemoryStore<T> {
    entities: RwLock<BTreeMap<String, T>>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> InMemoryStore<T> {
    /// Snapshot of all entities, ordered by uuid
    pub async fn all(&self) -> Vec<T> {
        self.entities.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl<T> EntityStore<T> for InMemoryStore<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    async fn save(&self, entities: Vec<T>) -> Result<usize> {
        let mut stored = self.entities.write().await;
        let count = entities.len();
        for entity in entities {
            stored.insert(entity.uuid().to_string(), entity);
        }
        Ok(count)
    }

    async fn get(&self, uuid: &str) -> Result<Option<T>> {
        Ok(self.entities.read().await.get(uuid).cloned())
    }

    async fn delete(&self, uuid: &str) -> Result<bool> {
        Ok(self.entities.write().await.remove(uuid).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entities.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cohort;

    fn cohort(uuid: &str, name: &str) -> Cohort {
        Cohort {
            uuid: uuid.to_string(),
            name: Some(name.to_string()),
            dynamic: false,
        }
    }

    #[tokio::test]
    async fn test_save_replaces_by_uuid() {
        let store: InMemoryStore<Cohort> = InMemoryStore::new();
        store
            .save(vec![cohort("c1", "Flu Patients"), cohort("c2", "Antenatal")])
            .await
            .unwrap();
        store.save(vec![cohort("c1", "Influenza")]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        let c1 = store.get("c1").await.unwrap().unwrap();
        assert_eq!(c1.name.as_deref(), Some("Influenza"));
    }

    #[tokio::test]
    async fn test_delete() {
        let store: InMemoryStore<Cohort> = InMemoryStore::new();
        store.save(vec![cohort("c1", "Flu Patients")]).await.unwrap();

        assert!(store.delete("c1").await.unwrap());
        assert!(!store.delete("c1").await.unwrap());
        assert!(store.get("c1").await.unwrap().is_none());
        assert!(store.all().await.is_empty());
    }
}
