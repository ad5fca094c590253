//! Registro de marcajes
//!
//! Convierte un marcaje en un registro de auditoría inmutable. El cerrojo del
//! billete cubre lectura, transición y escritura, así que de dos lectores que
//! marcan el mismo billete a la vez solo uno obtiene la `Validation`; el otro
//! recibe `AlreadyValidated`.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::Validation;
use crate::services::entity_locks::EntityLocks;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_not_empty;

pub struct ValidationService {
    state: AppState,
    locks: EntityLocks,
}

impl ValidationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            locks: state.locks.clone(),
        }
    }

    /// Marcar un billete a bordo de un vehículo, opcionalmente sobre una línea
    pub async fn validate_ticket(
        &self,
        ticket_id: Uuid,
        vehicle_id: Uuid,
        route_id: Option<Uuid>,
    ) -> AppResult<Validation> {
        // Vehículo y línea deben existir antes de consumir el billete
        self.state.storage.vehicles.get(vehicle_id).await?;
        if let Some(route_id) = route_id {
            self.state.storage.routes.get(route_id).await?;
        }

        let _guard = self.locks.acquire(ticket_id).await;
        let mut ticket = self.state.storage.tickets.get(ticket_id).await?;
        let unvalidated = ticket.clone();
        let now = self.state.now();

        let validation = match ticket.validate(vehicle_id, now, route_id) {
            Ok(validation) => validation,
            Err(e) => {
                warn!("❌ Marcaje rechazado para el billete {} en {}: {}", ticket_id, vehicle_id, e);
                return Err(e);
            }
        };

        // Primero el billete: es el estado que garantiza un único marcaje.
        // Si el registro de auditoría no se guarda, el billete vuelve a estar libre.
        self.state.storage.tickets.put(ticket).await?;
        let validation = match self.state.storage.validations.put(validation).await {
            Ok(validation) => validation,
            Err(e) => {
                if let Err(restore) = self.state.storage.tickets.put(unvalidated).await {
                    error!("❌ No se pudo liberar el billete {}: {}", ticket_id, restore);
                }
                return Err(e);
            }
        };

        info!("✅ Billete {} marcado en el vehículo {} ({})", ticket_id, vehicle_id, validation.id);
        Ok(validation)
    }

    /// Corrección de auditoría: el registro se conserva, solo se marca inválido
    pub async fn mark_invalid(&self, validation_id: Uuid, reason: &str) -> AppResult<Validation> {
        if validate_not_empty(reason).is_err() {
            return Err(validation_error("reason", "an invalidation reason is required"));
        }

        let _guard = self.locks.acquire(validation_id).await;
        let mut validation = self.state.storage.validations.get(validation_id).await?;
        validation.mark_invalid(reason);
        let validation = self.state.storage.validations.put(validation).await?;

        warn!("📝 Marcaje {} invalidado: {}", validation_id, reason.trim());
        Ok(validation)
    }

    pub async fn get(&self, validation_id: Uuid) -> AppResult<Validation> {
        self.state.storage.validations.get(validation_id).await
    }

    pub async fn validations_for_ticket(&self, ticket_id: Uuid) -> AppResult<Vec<Validation>> {
        self.state.storage.validations_by_ticket(ticket_id).await
    }

    pub async fn validations_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Validation>> {
        let mut validations = self
            .state
            .storage
            .validations
            .query(&move |v: &Validation| v.vehicle_id == vehicle_id)
            .await?;
        validations.sort_by_key(|v| v.validated_at);
        Ok(validations)
    }
}
