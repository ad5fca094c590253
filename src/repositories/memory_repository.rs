//! Repositorio en memoria
//!
//! Implementación de `Repository` sobre un `HashMap` protegido por un `RwLock`.
//! Sirve para tests, para la demo y como referencia para otros backends.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::entity::Entity;
use super::{Predicate, Repository};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct InMemoryRepository<T: Entity> {
    entries: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: Uuid) -> AppResult<T> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(T::KIND, &id))
    }

    async fn put(&self, entity: T) -> AppResult<T> {
        let mut entries = self.entries.write().await;
        let replaced = entries.insert(entity.id(), entity.clone()).is_some();
        debug!("💾 {} {} guardado (reemplazo: {})", T::KIND, entity.id(), replaced);
        Ok(entity)
    }

    async fn query(&self, predicate: Predicate<'_, T>) -> AppResult<Vec<T>> {
        let entries = self.entries.read().await;
        Ok(entries.values().filter(|e| predicate(*e)).cloned().collect())
    }
}
