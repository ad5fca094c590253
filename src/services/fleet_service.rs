//! Servicio de flota
//!
//! Alta de vehículos y cambios de estado operativo. Cada transición se hace con
//! el cerrojo del vehículo y escribe, en este orden, el periodo cerrado, el
//! vehículo y el periodo nuevo. Si alguna escritura falla se restauran el
//! periodo abierto y el vehículo originales antes de devolver el error, así el
//! historial siempre conserva exactamente un periodo abierto.

use rust_decimal::Decimal;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::service_period::check_timeline;
use crate::models::{PeriodKind, RegisterVehicleRequest, ServicePeriod, Vehicle};
use crate::services::entity_locks::EntityLocks;
use crate::state::AppState;
use crate::utils::errors::{overlap_error, validation_error, AppResult};

pub struct FleetService {
    state: AppState,
    locks: EntityLocks,
}

impl FleetService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn register_vehicle(&self, request: RegisterVehicleRequest) -> AppResult<Vehicle> {
        let (vehicle, period) = Vehicle::register(request, self.state.now())?;

        self.state.storage.put_period(period).await?;
        let vehicle = self.state.storage.vehicles.put(vehicle).await?;

        info!("🚌 Vehículo {} ({}) dado de alta", vehicle.license_plate, vehicle.id);
        Ok(vehicle)
    }

    pub async fn get_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vehicle> {
        self.state.storage.vehicles.get(vehicle_id).await
    }

    /// Entrar en mantenimiento; no hace nada si ya lo está
    pub async fn enter_maintenance(&self, vehicle_id: Uuid, note: &str) -> AppResult<Vehicle> {
        let _guard = self.locks.acquire(vehicle_id).await;
        let mut vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let mut open = self.state.storage.service_periods.get(vehicle.open_period_id).await?;
        let snapshot = (vehicle.clone(), open.clone());

        match vehicle.enter_maintenance(&mut open, self.state.now(), note)? {
            Some(next) => {
                let vehicle = self.persist_transition(snapshot, open, vehicle, next).await?;
                info!("🔧 Vehículo {} en mantenimiento", vehicle.license_plate);
                Ok(vehicle)
            }
            None => {
                debug!("Vehículo {} ya estaba en mantenimiento", vehicle.license_plate);
                Ok(vehicle)
            }
        }
    }

    /// Volver a servicio; el coste, si se indica, queda en el periodo de mantenimiento cerrado
    pub async fn return_to_service(
        &self,
        vehicle_id: Uuid,
        note: &str,
        maintenance_cost: Option<Decimal>,
    ) -> AppResult<Vehicle> {
        let _guard = self.locks.acquire(vehicle_id).await;
        let mut vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let mut open = self.state.storage.service_periods.get(vehicle.open_period_id).await?;

        if vehicle.is_in_service() {
            debug!("Vehículo {} ya estaba en servicio", vehicle.license_plate);
            return Ok(vehicle);
        }
        let snapshot = (vehicle.clone(), open.clone());
        if let Some(cost) = maintenance_cost {
            open.set_cost(cost)?;
        }

        match vehicle.return_to_service(&mut open, self.state.now(), note)? {
            Some(next) => {
                let vehicle = self.persist_transition(snapshot, open, vehicle, next).await?;
                info!("🚦 Vehículo {} de vuelta en servicio", vehicle.license_plate);
                Ok(vehicle)
            }
            None => Ok(vehicle),
        }
    }

    /// Guardar una transición aplicada en memoria. El periodo nuevo se escribe
    /// el último, así una escritura fallida solo deja por deshacer el periodo
    /// cerrado y el vehículo, que se restauran desde `snapshot`.
    async fn persist_transition(
        &self,
        snapshot: (Vehicle, ServicePeriod),
        closed: ServicePeriod,
        vehicle: Vehicle,
        next: ServicePeriod,
    ) -> AppResult<Vehicle> {
        let (original_vehicle, original_period) = snapshot;

        self.state.storage.put_period(closed).await?;
        let vehicle = match self.state.storage.vehicles.put(vehicle).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                self.restore(None, original_period).await;
                return Err(e);
            }
        };
        if let Err(e) = self.state.storage.put_period(next).await {
            self.restore(Some(original_vehicle), original_period).await;
            return Err(e);
        }
        Ok(vehicle)
    }

    async fn restore(&self, vehicle: Option<Vehicle>, open: ServicePeriod) {
        let vehicle_id = open.vehicle_id;
        if let Err(e) = self.state.storage.put_period(open).await {
            error!("❌ No se pudo restaurar el periodo abierto de {}: {}", vehicle_id, e);
        }
        if let Some(vehicle) = vehicle {
            if let Err(e) = self.state.storage.vehicles.put(vehicle).await {
                error!("❌ No se pudo restaurar el vehículo {}: {}", vehicle_id, e);
            }
        }
    }

    /// Periodo de mantenimiento en curso, si lo hay. Solo consulta.
    pub async fn open_maintenance_period(&self, vehicle_id: Uuid) -> AppResult<Option<ServicePeriod>> {
        let vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let open = self.state.storage.service_periods.get(vehicle.open_period_id).await?;
        Ok((open.kind == PeriodKind::Maintenance).then_some(open))
    }

    /// Registrar el coste del mantenimiento en curso
    pub async fn record_maintenance_cost(&self, vehicle_id: Uuid, cost: Decimal) -> AppResult<ServicePeriod> {
        let _guard = self.locks.acquire(vehicle_id).await;
        let vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let mut open = self.state.storage.service_periods.get(vehicle.open_period_id).await?;
        if open.kind != PeriodKind::Maintenance {
            return Err(validation_error("vehicle_id", "vehicle is not in maintenance"));
        }
        open.set_cost(cost)?;
        self.state.storage.put_period(open).await
    }

    pub async fn service_history(&self, vehicle_id: Uuid) -> AppResult<Vec<ServicePeriod>> {
        self.state.storage.vehicles.get(vehicle_id).await?;
        self.state.storage.periods_by_vehicle(vehicle_id).await
    }

    /// Verificar el historial guardado: sin solapes y con un único periodo
    /// abierto, que debe ser el que el vehículo apunta y del tipo de su estado
    pub async fn verify_history(&self, vehicle_id: Uuid) -> AppResult<()> {
        let vehicle = self.state.storage.vehicles.get(vehicle_id).await?;
        let periods = self.state.storage.periods_by_vehicle(vehicle_id).await?;
        check_timeline(vehicle_id, &periods)?;

        let consistent = periods.iter().any(|p| {
            p.is_open() && p.id == vehicle.open_period_id && p.kind == vehicle.state.period_kind()
        });
        if !consistent {
            return Err(overlap_error(vehicle_id, "open period does not match vehicle state"));
        }
        Ok(())
    }
}
