//! Cerrojos por entidad
//!
//! Serializa las transiciones que leen, modifican y vuelven a guardar una
//! entidad (marcaje de un billete, cambios de estado de un vehículo). Cada id
//! tiene su propio `Mutex`; las entradas que nadie usa se eliminan al pedir otra.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Guard que mantiene el cerrojo de una entidad hasta que se suelta
pub type EntityGuard = OwnedMutexGuard<()>;

#[derive(Clone, Default)]
pub struct EntityLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Esperar al cerrojo de `id`
    pub async fn acquire(&self, id: Uuid) -> EntityGuard {
        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Solo el mapa referencia estas entradas: nadie las tiene ni las espera
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Número de entidades con cerrojo vivo
    pub fn tracked(&self) -> usize {
        match self.locks.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
