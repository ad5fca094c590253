//! Modelo de Validation
//!
//! Registro de auditoría de un marcaje: une un billete, un vehículo y
//! opcionalmente una línea. Los vínculos son permanentes; solo puede marcarse
//! como inválido a posteriori y nunca se elimina.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Validation {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub vehicle_id: Uuid,
    pub route_id: Option<Uuid>,
    pub validated_at: DateTime<Utc>,
    pub valid: bool,
    pub invalidation_reason: Option<String>,
}

impl Validation {
    pub(crate) fn record(
        ticket_id: Uuid,
        vehicle_id: Uuid,
        route_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            vehicle_id,
            route_id,
            validated_at: at,
            valid: true,
            invalidation_reason: None,
        }
    }

    /// Corrección de auditoría; el último motivo prevalece
    pub fn mark_invalid(&mut self, reason: &str) {
        self.valid = false;
        self.invalidation_reason = Some(reason.trim().to_string());
    }
}
