//! Servicio de tarjetas
//!
//! Alta de viajeros con su tarjeta, renovación y desactivación. La validez de
//! los abonos se deriva de la tarjeta en cada consulta, así que desactivar una
//! tarjeta no necesita tocar sus abonos.

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Card, CardStatus, Pass, RegisterRiderRequest, Rider};
use crate::services::entity_locks::EntityLocks;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppResult};

pub struct CardService {
    state: AppState,
    locks: EntityLocks,
}

impl CardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            locks: state.locks.clone(),
        }
    }

    /// Registrar un viajero y emitir su tarjeta en la misma operación
    pub async fn register_rider(&self, request: RegisterRiderRequest) -> AppResult<(Rider, Card)> {
        let rider = Rider::from_request(request)?;
        let rider = self.state.storage.riders.put(rider).await?;
        let card = self.issue_card(rider.id).await?;

        let rider = self.state.storage.riders.get(rider.id).await?;
        Ok((rider, card))
    }

    /// Emitir una tarjeta para un viajero que aún no tiene ninguna
    pub async fn issue_card(&self, rider_id: Uuid) -> AppResult<Card> {
        let _guard = self.locks.acquire(rider_id).await;
        let mut rider = self.state.storage.riders.get(rider_id).await?;
        if let Some(existing) = rider.card_id {
            warn!("⚠️ El viajero {} ya tiene la tarjeta {}", rider_id, existing);
            return Err(validation_error("rider_id", "rider already holds a card"));
        }

        let now = self.state.now();
        let card = Card::issue_with_term(rider.id, now, self.state.policy().card_term_months);
        let card = self.state.storage.cards.put(card).await?;

        rider.card_id = Some(card.id);
        self.state.storage.riders.put(rider).await?;

        info!("🪪 Tarjeta {} emitida para {} (caduca {})", card.id, rider_id, card.expires_at);
        Ok(card)
    }

    pub async fn get_card(&self, card_id: Uuid) -> AppResult<Card> {
        self.state.storage.cards.get(card_id).await
    }

    /// Renovar: nueva caducidad desde ahora y tarjeta reactivada
    pub async fn renew_card(&self, card_id: Uuid) -> AppResult<Card> {
        let _guard = self.locks.acquire(card_id).await;
        let mut card = self.state.storage.cards.get(card_id).await?;
        card.renew_with_term(self.state.now(), self.state.policy().card_term_months);
        let card = self.state.storage.cards.put(card).await?;

        info!("🔄 Tarjeta {} renovada hasta {}", card.id, card.expires_at);
        Ok(card)
    }

    pub async fn deactivate_card(&self, card_id: Uuid) -> AppResult<Card> {
        let _guard = self.locks.acquire(card_id).await;
        let mut card = self.state.storage.cards.get(card_id).await?;
        card.deactivate();
        let card = self.state.storage.cards.put(card).await?;

        info!("⛔ Tarjeta {} desactivada", card.id);
        Ok(card)
    }

    pub async fn is_card_valid(&self, card_id: Uuid) -> AppResult<bool> {
        let card = self.state.storage.cards.get(card_id).await?;
        Ok(card.is_valid(self.state.now()))
    }

    pub async fn card_status(&self, card_id: Uuid) -> AppResult<CardStatus> {
        let card = self.state.storage.cards.get(card_id).await?;
        Ok(card.status(self.state.now()))
    }

    /// Abonos vinculados a la tarjeta, del más antiguo al más reciente
    pub async fn passes_for_card(&self, card_id: Uuid) -> AppResult<Vec<Pass>> {
        self.state.storage.cards.get(card_id).await?;
        self.state.storage.passes_by_card(card_id).await
    }

    /// Abonos de la tarjeta válidos ahora mismo
    pub async fn valid_passes_for_card(&self, card_id: Uuid) -> AppResult<Vec<Pass>> {
        let card = self.state.storage.cards.get(card_id).await?;
        let now = self.state.now();
        let passes = self.state.storage.passes_by_card(card_id).await?;
        Ok(passes.into_iter().filter(|p| p.is_valid(&card, now)).collect())
    }
}
