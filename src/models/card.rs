//! Modelo de Card
//!
//! Tarjeta personal de un viajero. Los abonos se vinculan a ella y su validez
//! depende de la de la tarjeta, así que desactivarla invalida todos sus abonos
//! sin tocarlos.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::policy::CARD_TERM_MONTHS;

/// Estado observable de la tarjeta en un instante dado
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Expired,
    Deactivated,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

/// Sumar meses de calendario; el 29 de febrero cae en el último día del mes destino
pub fn add_months(from: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    from.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl Card {
    /// Emitir una tarjeta con la vigencia estándar de un año
    pub fn issue(rider_id: Uuid, now: DateTime<Utc>) -> Self {
        Self::issue_with_term(rider_id, now, CARD_TERM_MONTHS)
    }

    pub fn issue_with_term(rider_id: Uuid, now: DateTime<Utc>, term_months: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            rider_id,
            issued_at: now,
            expires_at: add_months(now, term_months),
            active: true,
        }
    }

    /// Válida si está activa y no ha superado la caducidad (inclusiva)
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active && now <= self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn status(&self, now: DateTime<Utc>) -> CardStatus {
        if !self.active {
            CardStatus::Deactivated
        } else if self.is_expired(now) {
            CardStatus::Expired
        } else {
            CardStatus::Active
        }
    }

    /// Renovar: la caducidad se recalcula desde `now` y la tarjeta se reactiva
    pub fn renew(&mut self, now: DateTime<Utc>) {
        self.renew_with_term(now, CARD_TERM_MONTHS);
    }

    pub fn renew_with_term(&mut self, now: DateTime<Utc>, term_months: u32) {
        self.expires_at = add_months(now, term_months);
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
