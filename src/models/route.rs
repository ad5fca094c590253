//! Modelo de Route
//!
//! Línea de la red: zona de origen, terminal de destino y duración programada.
//! La duración programada es siempre mayor que cero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{validate_not_empty, validate_positive};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub origin_zone: String,
    pub terminus: String,
    pub scheduled_minutes: i64,
    pub distance_km: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una nueva ruta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub origin_zone: String,

    #[validate(length(min = 1, max = 100))]
    pub terminus: String,

    #[validate(range(min = 1, max = 1440))]
    pub scheduled_minutes: i64,

    pub distance_km: Option<Decimal>,
}

impl Route {
    pub fn create(request: CreateRouteRequest, now: DateTime<Utc>) -> AppResult<Self> {
        request.validate()?;

        for (field, value) in [
            ("name", &request.name),
            ("origin_zone", &request.origin_zone),
            ("terminus", &request.terminus),
        ] {
            if validate_not_empty(value).is_err() {
                return Err(validation_error(field, "must not be blank"));
            }
        }
        if let Some(distance) = request.distance_km {
            if validate_positive(distance).is_err() {
                return Err(validation_error("distance_km", "distance must be positive"));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            origin_zone: request.origin_zone.trim().to_string(),
            terminus: request.terminus.trim().to_string(),
            scheduled_minutes: request.scheduled_minutes,
            distance_km: request.distance_km,
            active: true,
            created_at: now,
        })
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
