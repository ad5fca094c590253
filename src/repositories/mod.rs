//! Frontera de almacenamiento
//!
//! El motor de ciclo de vida solo necesita tres operaciones del almacenamiento:
//! leer por id, guardar (alta o reemplazo completo) y consultar por predicado.
//! Cualquier backend que implemente `Repository` puede inyectarse en `Storage`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::utils::errors::AppResult;

pub mod entity;
pub mod memory_repository;
pub mod storage;

pub use entity::Entity;
pub use memory_repository::InMemoryRepository;
pub use storage::Storage;

/// Filtro aplicado por `Repository::query`
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// `NotFound` si no existe
    async fn get(&self, id: Uuid) -> AppResult<T>;

    async fn put(&self, entity: T) -> AppResult<T>;

    async fn query(&self, predicate: Predicate<'_, T>) -> AppResult<Vec<T>>;
}
