//! Modelo de Pass
//!
//! Abono semanal o mensual vinculado a una tarjeta. La ventana de validez es
//! `start..=end` con `end = start + kind.days()`, y el abono solo es válido
//! mientras la tarjeta propietaria también lo sea.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::Card;
use super::point_of_sale::PointOfSale;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PassKind {
    Weekly,
    Monthly,
}

impl PassKind {
    pub fn days(self) -> i64 {
        match self {
            PassKind::Weekly => 7,
            PassKind::Monthly => 30,
        }
    }

    /// Precio base en euros
    pub fn base_price(self) -> Decimal {
        match self {
            PassKind::Weekly => Decimal::new(1200, 2),
            PassKind::Monthly => Decimal::new(3500, 2),
        }
    }

    pub fn duration(self) -> Duration {
        Duration::days(self.days())
    }
}

/// Estado observable del abono
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassStatus {
    /// Emitido, aún no ha empezado su ventana
    Pending,
    Active,
    Deactivated,
    Expired,
    /// Dentro de ventana pero la tarjeta no es válida
    CardInvalid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pass {
    pub id: Uuid,
    pub kind: PassKind,
    pub issued_at: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub price: Decimal,
    pub active: bool,
    pub card_id: Uuid,
    pub point_of_sale_id: Uuid,
}

impl Pass {
    /// Emitir un abono; la tarjeta debe ser válida en `start`
    pub fn issue(
        kind: PassKind,
        card: &Card,
        point_of_sale: &PointOfSale,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        if !point_of_sale.can_issue() {
            return Err(AppError::PointOfSaleUnavailable {
                point_of_sale_id: point_of_sale.id,
            });
        }
        if !card.is_valid(start) {
            return Err(AppError::InvalidCard {
                card_id: card.id,
                at: start,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            issued_at: now,
            start,
            end: start + kind.duration(),
            price: kind.base_price(),
            active: true,
            card_id: card.id,
            point_of_sale_id: point_of_sale.id,
        })
    }

    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }

    /// La validez nunca es puramente local: también exige la tarjeta válida
    pub fn is_valid(&self, card: &Card, now: DateTime<Utc>) -> bool {
        card.id == self.card_id && self.active && self.in_window(now) && card.is_valid(now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }

    pub fn status(&self, card: &Card, now: DateTime<Utc>) -> PassStatus {
        if self.is_expired(now) {
            PassStatus::Expired
        } else if !self.active {
            PassStatus::Deactivated
        } else if now < self.start {
            PassStatus::Pending
        } else if card.id != self.card_id || !card.is_valid(now) {
            PassStatus::CardInvalid
        } else {
            PassStatus::Active
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Reactivar solo es posible antes de que termine la ventana
    pub fn reactivate(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_expired(now) {
            return Err(AppError::PassExpired {
                pass_id: self.id,
                ended_at: self.end,
            });
        }
        self.active = true;
        Ok(())
    }
}
