//! Servicio de recorridos
//!
//! Configuración de líneas y seguimiento de los recorridos de los vehículos:
//! salida, llegada con cálculo de retraso y contadores de pasajeros.

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{CreateRouteRequest, Route, RouteTraversal};
use crate::services::entity_locks::EntityLocks;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Resumen de puntualidad de un recorrido completado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Punctuality {
    pub delay_minutes: i64,
    pub on_time: bool,
    pub late: bool,
    pub early: bool,
}

pub struct TraversalService {
    state: AppState,
    locks: EntityLocks,
}

impl TraversalService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn create_route(&self, request: CreateRouteRequest) -> AppResult<Route> {
        let route = Route::create(request, self.state.now())?;
        let route = self.state.storage.routes.put(route).await?;
        info!("🗺️ Línea {} creada: {} → {} ({} min)", route.name, route.origin_zone, route.terminus, route.scheduled_minutes);
        Ok(route)
    }

    pub async fn set_route_active(&self, route_id: Uuid, active: bool) -> AppResult<Route> {
        let _guard = self.locks.acquire(route_id).await;
        let mut route = self.state.storage.routes.get(route_id).await?;
        if active {
            route.activate();
        } else {
            route.deactivate();
        }
        let route = self.state.storage.routes.put(route).await?;
        info!("🗺️ Línea {} activa: {}", route.name, active);
        Ok(route)
    }

    /// Salida de un vehículo en servicio sobre una línea activa. Toma el
    /// cerrojo del vehículo para no salir mientras entra en mantenimiento.
    pub async fn start(&self, vehicle_id: Uuid, route_id: Uuid) -> AppResult<RouteTraversal> {
        let _guard = self.locks.acquire(vehicle_id).await;
        let vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let route = self.state.storage.routes.get(route_id).await?;

        if !vehicle.is_in_service() {
            warn!("❌ {} no está en servicio, no puede salir", vehicle.license_plate);
            return Err(AppError::Unavailable(format!(
                "vehicle {} is not in service",
                vehicle.license_plate
            )));
        }
        if !route.active {
            return Err(AppError::Unavailable(format!("route {} is not active", route.name)));
        }

        let traversal = RouteTraversal::start(&vehicle, &route, self.state.now());
        let traversal = self.state.storage.traversals.put(traversal).await?;
        info!("🚏 {} sale en la línea {} ({})", vehicle.license_plate, route.name, traversal.id);
        Ok(traversal)
    }

    /// Llegada: fija duración real y retraso una sola vez
    pub async fn complete(&self, traversal_id: Uuid) -> AppResult<RouteTraversal> {
        let _guard = self.locks.acquire(traversal_id).await;
        let mut traversal = self.state.storage.traversals.get(traversal_id).await?;
        traversal.complete(self.state.now())?;
        let traversal = self.state.storage.traversals.put(traversal).await?;

        info!(
            "🏁 Recorrido {} completado: {} min (retraso {:+} min)",
            traversal.id,
            traversal.actual_minutes.unwrap_or_default(),
            traversal.delay_minutes.unwrap_or_default()
        );
        Ok(traversal)
    }

    pub async fn record_passengers(
        &self,
        traversal_id: Uuid,
        boarded: Option<u32>,
        alighted: Option<u32>,
    ) -> AppResult<RouteTraversal> {
        let _guard = self.locks.acquire(traversal_id).await;
        let mut traversal = self.state.storage.traversals.get(traversal_id).await?;
        if let Some(count) = boarded {
            traversal.record_boarding(count);
        }
        if let Some(count) = alighted {
            traversal.record_alighting(count);
        }
        self.state.storage.traversals.put(traversal).await
    }

    /// `None` mientras el recorrido no esté completado
    pub async fn punctuality(&self, traversal_id: Uuid) -> AppResult<Option<Punctuality>> {
        let traversal = self.state.storage.traversals.get(traversal_id).await?;
        let tolerance = self.state.policy().punctuality_tolerance_minutes;
        Ok(traversal.delay_minutes.map(|delay_minutes| Punctuality {
            delay_minutes,
            on_time: traversal.is_on_time_within(tolerance),
            late: traversal.is_late(),
            early: traversal.is_early(),
        }))
    }

    pub async fn traversals_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<RouteTraversal>> {
        self.state.storage.traversals_by_vehicle(vehicle_id).await
    }
}
