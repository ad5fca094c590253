//! Reloj inyectable
//!
//! Todas las reglas de validez dependen del instante actual; los servicios
//! lo leen siempre a través de un `Clock` para poder probarlas con tiempo sintético.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Fuente del instante actual
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema para producción
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj manual para tests y demos: solo avanza cuando se le pide
#[derive(Debug)]
pub struct ManualClock {
    time: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: RwLock::new(time),
        }
    }

    /// Fijar el instante actual
    pub fn set(&self, time: DateTime<Utc>) {
        match self.time.write() {
            Ok(mut guard) => *guard = time,
            Err(poisoned) => *poisoned.into_inner() = time,
        }
    }

    /// Avanzar el reloj y devolver el nuevo instante
    pub fn advance(&self, delta: Duration) -> DateTime<Utc> {
        let next = self.now() + delta;
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.time.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
