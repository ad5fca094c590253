//! Modelo de Ticket
//!
//! Billete sencillo. Caduca 90 minutos después de la emisión y se consume con
//! un único marcaje: Issued → Valid → {Validated | Expired}, ambos terminales.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::point_of_sale::PointOfSale;
use super::validation::Validation;
use crate::config::policy::TICKET_VALIDITY_MINUTES;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::validate_non_negative;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Valid,
    Validated,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub price: Decimal,
    pub validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_id: Option<Uuid>,
    pub point_of_sale_id: Uuid,
}

impl Ticket {
    pub fn issue(price: Decimal, point_of_sale: &PointOfSale, now: DateTime<Utc>) -> AppResult<Self> {
        Self::issue_with_validity(
            price,
            point_of_sale,
            now,
            Duration::minutes(TICKET_VALIDITY_MINUTES),
        )
    }

    pub fn issue_with_validity(
        price: Decimal,
        point_of_sale: &PointOfSale,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> AppResult<Self> {
        if validate_non_negative(price).is_err() {
            return Err(validation_error("price", "price must not be negative"));
        }
        if !point_of_sale.can_issue() {
            return Err(AppError::PointOfSaleUnavailable {
                point_of_sale_id: point_of_sale.id,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            issued_at: now,
            expires_at: now + validity,
            price,
            validated: false,
            validated_at: None,
            validation_id: None,
            point_of_sale_id: point_of_sale.id,
        })
    }

    /// Canjeable si no se ha marcado y aún no ha caducado (caducidad exclusiva)
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.validated && now < self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.validated && now >= self.expires_at
    }

    pub fn status(&self, now: DateTime<Utc>) -> TicketStatus {
        if self.validated {
            TicketStatus::Validated
        } else if now >= self.expires_at {
            TicketStatus::Expired
        } else {
            TicketStatus::Valid
        }
    }

    /// Única transición del billete. Un segundo marcaje devuelve
    /// `AlreadyValidated` y deja intacto `validated_at`.
    pub fn validate(
        &mut self,
        vehicle_id: Uuid,
        now: DateTime<Utc>,
        route_id: Option<Uuid>,
    ) -> AppResult<Validation> {
        if self.validated {
            return Err(AppError::AlreadyValidated { ticket_id: self.id });
        }
        if now >= self.expires_at {
            return Err(AppError::Expired {
                ticket_id: self.id,
                expired_at: self.expires_at,
            });
        }

        let validation = Validation::record(self.id, vehicle_id, route_id, now);
        self.validated = true;
        self.validated_at = Some(now);
        self.validation_id = Some(validation.id);
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 7, 30, 0).unwrap()
    }

    fn ticket() -> Ticket {
        let pos = PointOfSale::vending_machine("Porta Nuova");
        Ticket::issue(Decimal::new(150, 2), &pos, t0()).unwrap()
    }

    #[test]
    fn test_validity_window_is_ninety_minutes() {
        let ticket = ticket();
        assert_eq!(ticket.expires_at, t0() + Duration::minutes(90));
        assert!(ticket.is_valid(t0() + Duration::minutes(89)));
        assert!(!ticket.is_valid(t0() + Duration::minutes(90)));
        assert!(!ticket.is_valid(t0() + Duration::minutes(91)));
        assert_eq!(ticket.status(t0() + Duration::minutes(91)), TicketStatus::Expired);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let pos = PointOfSale::vending_machine("Porta Nuova");
        let result = Ticket::issue(Decimal::new(-1, 0), &pos, t0());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_free_ticket_is_allowed() {
        let pos = PointOfSale::vending_machine("Porta Nuova");
        assert!(Ticket::issue(Decimal::ZERO, &pos, t0()).is_ok());
    }

    #[test]
    fn test_validate_once_then_already_validated() {
        let mut ticket = ticket();
        let vehicle = Uuid::new_v4();
        let route = Uuid::new_v4();
        let at = t0() + Duration::minutes(10);

        let validation = ticket.validate(vehicle, at, Some(route)).unwrap();
        assert_eq!(validation.ticket_id, ticket.id);
        assert_eq!(validation.route_id, Some(route));
        assert!(validation.valid);
        assert_eq!(ticket.validation_id, Some(validation.id));
        assert!(!ticket.is_valid(at));
        assert_eq!(ticket.status(at), TicketStatus::Validated);

        let again = ticket.validate(vehicle, at + Duration::minutes(1), None);
        assert!(matches!(again, Err(AppError::AlreadyValidated { .. })));
        assert_eq!(ticket.validated_at, Some(at));
    }

    #[test]
    fn test_validate_after_expiry_fails() {
        let mut ticket = ticket();
        let result = ticket.validate(Uuid::new_v4(), t0() + Duration::minutes(90), None);
        assert!(matches!(result, Err(AppError::Expired { .. })));
        assert!(!ticket.validated);
        assert!(ticket.validated_at.is_none());
    }

    #[test]
    fn test_mark_invalid_keeps_links() {
        let mut ticket = ticket();
        let vehicle = Uuid::new_v4();
        let mut validation = ticket.validate(vehicle, t0(), None).unwrap();
        validation.mark_invalid("  reader clock drift ");
        assert!(!validation.valid);
        assert_eq!(validation.invalidation_reason.as_deref(), Some("reader clock drift"));
        assert_eq!(validation.ticket_id, ticket.id);
        assert_eq!(validation.vehicle_id, vehicle);
    }
}
