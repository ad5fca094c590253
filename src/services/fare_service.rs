//! Servicio de títulos de viaje
//!
//! Emisión de billetes y abonos, y ciclo de vida de los abonos
//! (desactivar / reactivar). El marcaje de billetes vive en `ValidationService`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Pass, PassKind, PassStatus, PointOfSale, Ticket, TicketStatus};
use crate::services::entity_locks::EntityLocks;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppResult};

pub struct FareService {
    state: AppState,
    locks: EntityLocks,
}

impl FareService {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn register_point_of_sale(&self, point_of_sale: PointOfSale) -> AppResult<PointOfSale> {
        let point_of_sale = self.state.storage.points_of_sale.put(point_of_sale).await?;
        info!("🏪 Punto de venta {} registrado en {}", point_of_sale.id, point_of_sale.location);
        Ok(point_of_sale)
    }

    /// Poner una máquina expendedora fuera de servicio o devolverla al servicio
    pub async fn set_vending_machine_in_service(
        &self,
        point_of_sale_id: Uuid,
        in_service: bool,
    ) -> AppResult<PointOfSale> {
        let _guard = self.locks.acquire(point_of_sale_id).await;
        let mut point_of_sale = self.state.storage.points_of_sale.get(point_of_sale_id).await?;
        if !point_of_sale.set_in_service(in_service) {
            return Err(validation_error(
                "point_of_sale_id",
                "only vending machines have a service state",
            ));
        }
        let point_of_sale = self.state.storage.points_of_sale.put(point_of_sale).await?;
        info!("🏪 Máquina {} en servicio: {}", point_of_sale.id, in_service);
        Ok(point_of_sale)
    }

    pub async fn issue_ticket(&self, price: Decimal, point_of_sale_id: Uuid) -> AppResult<Ticket> {
        let point_of_sale = self.state.storage.points_of_sale.get(point_of_sale_id).await?;
        let now = self.state.now();

        let ticket = Ticket::issue_with_validity(
            price,
            &point_of_sale,
            now,
            self.state.policy().ticket_validity,
        )?;
        let ticket = self.state.storage.tickets.put(ticket).await?;

        info!("🎫 Billete {} emitido en {} (caduca {})", ticket.id, point_of_sale_id, ticket.expires_at);
        Ok(ticket)
    }

    pub async fn get_ticket(&self, ticket_id: Uuid) -> AppResult<Ticket> {
        self.state.storage.tickets.get(ticket_id).await
    }

    pub async fn ticket_status(&self, ticket_id: Uuid) -> AppResult<TicketStatus> {
        let ticket = self.state.storage.tickets.get(ticket_id).await?;
        Ok(ticket.status(self.state.now()))
    }

    /// Emitir un abono que empieza en `start`; la tarjeta debe ser válida en esa fecha
    pub async fn issue_pass(
        &self,
        kind: PassKind,
        card_id: Uuid,
        point_of_sale_id: Uuid,
        start: DateTime<Utc>,
    ) -> AppResult<Pass> {
        let card = self.state.storage.cards.get(card_id).await?;
        let point_of_sale = self.state.storage.points_of_sale.get(point_of_sale_id).await?;
        let now = self.state.now();

        let pass = match Pass::issue(kind, &card, &point_of_sale, start, now) {
            Ok(pass) => pass,
            Err(e) => {
                warn!("❌ Abono {:?} rechazado para la tarjeta {}: {}", kind, card_id, e);
                return Err(e);
            }
        };
        let pass = self.state.storage.passes.put(pass).await?;

        info!("🎟️ Abono {:?} {} emitido: {} → {}", kind, pass.id, pass.start, pass.end);
        Ok(pass)
    }

    pub async fn get_pass(&self, pass_id: Uuid) -> AppResult<Pass> {
        self.state.storage.passes.get(pass_id).await
    }

    /// Validez del abono ahora, consultando también su tarjeta
    pub async fn is_pass_valid(&self, pass_id: Uuid) -> AppResult<bool> {
        let pass = self.state.storage.passes.get(pass_id).await?;
        let card = self.state.storage.cards.get(pass.card_id).await?;
        let valid = pass.is_valid(&card, self.state.now());
        debug!("🔍 Abono {} válido: {}", pass_id, valid);
        Ok(valid)
    }

    pub async fn pass_status(&self, pass_id: Uuid) -> AppResult<PassStatus> {
        let pass = self.state.storage.passes.get(pass_id).await?;
        let card = self.state.storage.cards.get(pass.card_id).await?;
        Ok(pass.status(&card, self.state.now()))
    }

    pub async fn deactivate_pass(&self, pass_id: Uuid) -> AppResult<Pass> {
        let _guard = self.locks.acquire(pass_id).await;
        let mut pass = self.state.storage.passes.get(pass_id).await?;
        pass.deactivate();
        let pass = self.state.storage.passes.put(pass).await?;
        info!("⛔ Abono {} desactivado", pass.id);
        Ok(pass)
    }

    pub async fn reactivate_pass(&self, pass_id: Uuid) -> AppResult<Pass> {
        let _guard = self.locks.acquire(pass_id).await;
        let mut pass = self.state.storage.passes.get(pass_id).await?;
        pass.reactivate(self.state.now())?;
        let pass = self.state.storage.passes.put(pass).await?;
        info!("✅ Abono {} reactivado", pass.id);
        Ok(pass)
    }
}
