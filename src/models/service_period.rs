//! Modelo de ServicePeriod
//!
//! Intervalo continuo `[start, end)` en el que un vehículo permanece en un
//! mismo estado operativo. `end = None` significa periodo abierto; una vez
//! fijado, `end` no se vuelve a borrar.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::{overlap_error, validation_error, AppError, AppResult};
use crate::utils::validation::validate_non_negative;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Service,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePeriod {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: PeriodKind,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub note: String,
    /// Solo para mantenimiento
    pub cost: Option<Decimal>,
}

impl ServicePeriod {
    pub(crate) fn open(vehicle_id: Uuid, kind: PeriodKind, start: DateTime<Utc>, note: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            kind,
            start,
            end: None,
            note: note.trim().to_string(),
            cost: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Cerrar el periodo en `end`
    pub fn close(&mut self, end: DateTime<Utc>) -> AppResult<()> {
        if !self.is_open() {
            return Err(AppError::PeriodAlreadyClosed { period_id: self.id });
        }
        if end < self.start {
            return Err(AppError::InvalidInterval {
                start: self.start,
                end,
            });
        }
        self.end = Some(end);
        Ok(())
    }

    /// Registrar el coste de un periodo de mantenimiento
    pub fn set_cost(&mut self, cost: Decimal) -> AppResult<()> {
        if self.kind != PeriodKind::Maintenance {
            return Err(validation_error("cost", "only maintenance periods carry a cost"));
        }
        if validate_non_negative(cost).is_err() {
            return Err(validation_error("cost", "cost must not be negative"));
        }
        self.cost = Some(cost);
        Ok(())
    }

    /// Duración hasta `end`, o hasta `now` si sigue abierto
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && self.end.map_or(true, |end| at < end)
    }

    /// Orden cronológico; a igual inicio, el periodo abierto va el último
    pub fn timeline_key(&self) -> (DateTime<Utc>, bool) {
        (self.start, self.is_open())
    }

    /// Dos intervalos semiabiertos se solapan si cada uno empieza antes del fin del otro
    pub fn overlaps(&self, other: &ServicePeriod) -> bool {
        let before_end = |start: DateTime<Utc>, end: Option<DateTime<Utc>>| {
            end.map_or(true, |end| start < end)
        };
        before_end(self.start, other.end) && before_end(other.start, self.end)
    }
}

/// Comprobar el historial completo de un vehículo: sin solapamientos y con
/// exactamente un periodo abierto, que además es el último.
pub fn check_timeline(vehicle_id: Uuid, periods: &[ServicePeriod]) -> AppResult<()> {
    let mut sorted: Vec<&ServicePeriod> = periods.iter().collect();
    sorted.sort_by_key(|p| p.timeline_key());

    for pair in sorted.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(overlap_error(
                vehicle_id,
                &format!("periods {} and {} overlap", pair[0].id, pair[1].id),
            ));
        }
    }

    let open = sorted.iter().filter(|p| p.is_open()).count();
    if open != 1 {
        return Err(overlap_error(
            vehicle_id,
            &format!("expected exactly one open period, found {}", open),
        ));
    }
    if sorted.last().map_or(true, |last| !last.is_open()) {
        return Err(overlap_error(vehicle_id, "open period is not the latest one"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_close_once() {
        let mut period = ServicePeriod::open(Uuid::new_v4(), PeriodKind::Service, at(6), "");
        period.close(at(8)).unwrap();
        assert_eq!(period.duration(at(23)), Duration::hours(2));

        let again = period.close(at(9));
        assert!(matches!(again, Err(AppError::PeriodAlreadyClosed { .. })));
        assert_eq!(period.end, Some(at(8)));
    }

    #[test]
    fn test_close_before_start_is_refused() {
        let mut period = ServicePeriod::open(Uuid::new_v4(), PeriodKind::Service, at(6), "");
        assert!(matches!(period.close(at(5)), Err(AppError::InvalidInterval { .. })));
        assert!(period.is_open());
    }

    #[test]
    fn test_cost_only_for_maintenance() {
        let vehicle = Uuid::new_v4();
        let mut service = ServicePeriod::open(vehicle, PeriodKind::Service, at(6), "");
        assert!(service.set_cost(Decimal::new(100, 0)).is_err());

        let mut maintenance = ServicePeriod::open(vehicle, PeriodKind::Maintenance, at(6), "brakes");
        maintenance.set_cost(Decimal::new(45000, 2)).unwrap();
        assert_eq!(maintenance.cost, Some(Decimal::new(45000, 2)));
        assert!(maintenance.set_cost(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_adjacent_periods_do_not_overlap() {
        let vehicle = Uuid::new_v4();
        let mut first = ServicePeriod::open(vehicle, PeriodKind::Service, at(6), "");
        first.close(at(8)).unwrap();
        let second = ServicePeriod::open(vehicle, PeriodKind::Maintenance, at(8), "");
        assert!(!first.overlaps(&second));
        assert!(check_timeline(vehicle, &[second.clone(), first.clone()]).is_ok());

        let early = ServicePeriod::open(vehicle, PeriodKind::Service, at(7), "");
        assert!(early.overlaps(&first));
        assert!(matches!(
            check_timeline(vehicle, &[first, early]),
            Err(AppError::Overlap { .. })
        ));
    }

    #[test]
    fn test_timeline_requires_single_open_period() {
        let vehicle = Uuid::new_v4();
        let mut closed = ServicePeriod::open(vehicle, PeriodKind::Service, at(6), "");
        closed.close(at(7)).unwrap();
        assert!(check_timeline(vehicle, &[closed]).is_err());
        assert!(check_timeline(vehicle, &[]).is_err());
    }

    #[test]
    fn test_contains_is_half_open() {
        let mut period = ServicePeriod::open(Uuid::new_v4(), PeriodKind::Service, at(6), "");
        period.close(at(8)).unwrap();
        assert!(period.contains(at(6)));
        assert!(!period.contains(at(8)));
    }
}
