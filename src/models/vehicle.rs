//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus variantes (autobús/tranvía) y la
//! máquina de estados operativa. Cada transición cierra el periodo abierto y
//! abre uno nuevo, así que el historial siempre tiene un único periodo abierto
//! cuyo tipo coincide con el estado actual.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::service_period::{PeriodKind, ServicePeriod};
use crate::utils::errors::{overlap_error, validation_error, AppResult};
use crate::utils::validation::{normalize_license_plate, validate_license_plate};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    Cng,
    Hybrid,
    Electric,
}

/// Variante del vehículo con sus atributos específicos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VehicleKind {
    Bus { fuel: FuelType },
    Tram { carriages: u8 },
}

/// Estado operativo del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationalState {
    InService,
    InMaintenance,
}

impl OperationalState {
    pub fn period_kind(self) -> PeriodKind {
        match self {
            OperationalState::InService => PeriodKind::Service,
            OperationalState::InMaintenance => PeriodKind::Maintenance,
        }
    }
}

/// Vehicle principal. El historial de periodos vive fuera, enlazado por `vehicle_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub kind: VehicleKind,
    pub capacity: u32,
    pub state: OperationalState,
    pub open_period_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// Request para dar de alta un vehículo en la flota
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(length(min = 2, max = 20))]
    pub license_plate: String,

    pub kind: VehicleKind,

    #[validate(range(min = 1, max = 400))]
    pub capacity: u32,
}

impl Vehicle {
    /// Alta en flota: el vehículo nace en servicio con su primer periodo abierto
    pub fn register(
        request: RegisterVehicleRequest,
        now: DateTime<Utc>,
    ) -> AppResult<(Vehicle, ServicePeriod)> {
        request.validate()?;

        let license_plate = normalize_license_plate(&request.license_plate);
        if validate_license_plate(&license_plate).is_err() {
            return Err(validation_error("license_plate", "invalid license plate format"));
        }
        if let VehicleKind::Tram { carriages: 0 } = request.kind {
            return Err(validation_error("carriages", "a tram needs at least one carriage"));
        }

        let id = Uuid::new_v4();
        let period = ServicePeriod::open(id, PeriodKind::Service, now, "fleet registration");
        let vehicle = Vehicle {
            id,
            license_plate,
            kind: request.kind,
            capacity: request.capacity,
            state: OperationalState::InService,
            open_period_id: period.id,
            registered_at: now,
        };
        Ok((vehicle, period))
    }

    pub fn is_in_service(&self) -> bool {
        self.state == OperationalState::InService
    }

    pub fn is_bus(&self) -> bool {
        matches!(self.kind, VehicleKind::Bus { .. })
    }

    pub fn is_tram(&self) -> bool {
        matches!(self.kind, VehicleKind::Tram { .. })
    }

    /// Entrar en mantenimiento. Devuelve `None` si ya lo estaba.
    pub fn enter_maintenance(
        &mut self,
        open: &mut ServicePeriod,
        now: DateTime<Utc>,
        note: &str,
    ) -> AppResult<Option<ServicePeriod>> {
        self.switch_to(OperationalState::InMaintenance, open, now, note)
    }

    /// Volver a servicio. Devuelve `None` si ya lo estaba.
    pub fn return_to_service(
        &mut self,
        open: &mut ServicePeriod,
        now: DateTime<Utc>,
        note: &str,
    ) -> AppResult<Option<ServicePeriod>> {
        self.switch_to(OperationalState::InService, open, now, note)
    }

    fn switch_to(
        &mut self,
        target: OperationalState,
        open: &mut ServicePeriod,
        now: DateTime<Utc>,
        note: &str,
    ) -> AppResult<Option<ServicePeriod>> {
        if self.state == target {
            return Ok(None);
        }
        if open.id != self.open_period_id || open.vehicle_id != self.id || !open.is_open() {
            return Err(overlap_error(self.id, "given period is not this vehicle's open period"));
        }
        if now < open.start {
            return Err(overlap_error(
                self.id,
                "transition instant precedes the start of the open period",
            ));
        }

        open.close(now)?;
        let next = ServicePeriod::open(self.id, target.period_kind(), now, note);
        self.state = target;
        self.open_period_id = next.id;
        Ok(Some(next))
    }
}
