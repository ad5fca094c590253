//! Shared application state
//!
//! Este módulo define el estado compartido que reciben los servicios:
//! almacenamiento, reloj, configuración y cerrojos por entidad.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::config::policy::LifecyclePolicy;
use crate::repositories::Storage;
use crate::services::entity_locks::EntityLocks;
use crate::utils::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub clock: Arc<dyn Clock>,
    pub config: EnvironmentConfig,
    pub locks: EntityLocks,
}

impl AppState {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, config: EnvironmentConfig) -> Self {
        Self {
            storage,
            clock,
            config,
            locks: EntityLocks::new(),
        }
    }

    /// Estado en memoria con la configuración por defecto
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(Storage::in_memory(), clock, EnvironmentConfig::default())
    }

    /// Estado en memoria con el reloj del sistema
    pub fn with_system_clock(config: EnvironmentConfig) -> Self {
        Self::new(Storage::in_memory(), Arc::new(SystemClock), config)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.config.policy()
    }
}
