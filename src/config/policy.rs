//! Reglas temporales del motor de ciclo de vida

use chrono::Duration;

/// Validez de un billete sencillo desde su emisión
pub const TICKET_VALIDITY_MINUTES: i64 = 90;

/// Vigencia de una tarjeta desde su emisión o renovación
pub const CARD_TERM_MONTHS: u32 = 12;

/// Margen (inclusivo) para considerar puntual un recorrido
pub const PUNCTUALITY_TOLERANCE_MINUTES: i64 = 2;

/// Parámetros temporales que los servicios aplican a los modelos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub ticket_validity: Duration,
    pub card_term_months: u32,
    pub punctuality_tolerance_minutes: i64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            ticket_validity: Duration::minutes(TICKET_VALIDITY_MINUTES),
            card_term_months: CARD_TERM_MONTHS,
            punctuality_tolerance_minutes: PUNCTUALITY_TOLERANCE_MINUTES,
        }
    }
}
