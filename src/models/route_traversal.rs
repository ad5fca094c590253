//! Modelo de RouteTraversal
//!
//! Un recorrido concreto de un vehículo sobre una línea, con la duración real
//! medida. El retraso se calcula una sola vez, al completar, y no se recalcula.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::route::Route;
use super::vehicle::Vehicle;
use crate::config::policy::PUNCTUALITY_TOLERANCE_MINUTES;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteTraversal {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub route_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub scheduled_minutes: i64,
    pub actual_minutes: Option<i64>,
    /// Real menos programado: positivo = tarde, negativo = adelantado
    pub delay_minutes: Option<i64>,
    pub completed: bool,
    pub boarded: Option<u32>,
    pub alighted: Option<u32>,
}

impl RouteTraversal {
    pub fn start(vehicle: &Vehicle, route: &Route, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            route_id: route.id,
            started_at: now,
            ended_at: None,
            scheduled_minutes: route.scheduled_minutes,
            actual_minutes: None,
            delay_minutes: None,
            completed: false,
            boarded: None,
            alighted: None,
        }
    }

    /// Completar el recorrido; un segundo intento devuelve `AlreadyCompleted`
    pub fn complete(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.completed {
            return Err(AppError::AlreadyCompleted {
                traversal_id: self.id,
            });
        }
        if now < self.started_at {
            return Err(AppError::InvalidInterval {
                start: self.started_at,
                end: now,
            });
        }

        let actual = (now - self.started_at).num_minutes();
        self.ended_at = Some(now);
        self.actual_minutes = Some(actual);
        self.delay_minutes = Some(actual - self.scheduled_minutes);
        self.completed = true;
        Ok(())
    }

    pub fn is_on_time(&self) -> bool {
        self.is_on_time_within(PUNCTUALITY_TOLERANCE_MINUTES)
    }

    /// Puntual si |retraso| ≤ tolerancia (frontera inclusiva)
    pub fn is_on_time_within(&self, tolerance_minutes: i64) -> bool {
        self.delay_minutes
            .map_or(false, |delay| delay.abs() <= tolerance_minutes)
    }

    pub fn is_late(&self) -> bool {
        self.delay_minutes.map_or(false, |delay| delay > 0)
    }

    pub fn is_early(&self) -> bool {
        self.delay_minutes.map_or(false, |delay| delay < 0)
    }

    pub fn record_boarding(&mut self, count: u32) {
        self.boarded = Some(self.boarded.unwrap_or(0).saturating_add(count));
    }

    pub fn record_alighting(&mut self, count: u32) {
        self.alighted = Some(self.alighted.unwrap_or(0).saturating_add(count));
    }

    /// Subidas menos bajadas; `None` si nunca se registró ninguna de las dos
    pub fn net_passengers(&self) -> Option<i64> {
        if self.boarded.is_none() && self.alighted.is_none() {
            return None;
        }
        Some(i64::from(self.boarded.unwrap_or(0)) - i64::from(self.alighted.unwrap_or(0)))
    }
}
