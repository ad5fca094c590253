//! Handle de almacenamiento
//!
//! Agrupa un repositorio por tipo de entidad. Se construye una vez en el
//! arranque y se pasa a cada servicio; no hay estado global.

use std::sync::Arc;
use uuid::Uuid;

use super::{InMemoryRepository, Repository};
use crate::models::{
    Card, Pass, PointOfSale, Rider, Route, RouteTraversal, ServicePeriod, Ticket, Validation,
    Vehicle,
};
use crate::utils::errors::{overlap_error, AppResult};

#[derive(Clone)]
pub struct Storage {
    pub riders: Arc<dyn Repository<Rider>>,
    pub cards: Arc<dyn Repository<Card>>,
    pub passes: Arc<dyn Repository<Pass>>,
    pub tickets: Arc<dyn Repository<Ticket>>,
    pub validations: Arc<dyn Repository<Validation>>,
    pub points_of_sale: Arc<dyn Repository<PointOfSale>>,
    pub vehicles: Arc<dyn Repository<Vehicle>>,
    pub service_periods: Arc<dyn Repository<ServicePeriod>>,
    pub routes: Arc<dyn Repository<Route>>,
    pub traversals: Arc<dyn Repository<RouteTraversal>>,
}

impl Storage {
    /// Almacenamiento en memoria para tests y demos
    pub fn in_memory() -> Self {
        Self {
            riders: Arc::new(InMemoryRepository::<Rider>::new()),
            cards: Arc::new(InMemoryRepository::<Card>::new()),
            passes: Arc::new(InMemoryRepository::<Pass>::new()),
            tickets: Arc::new(InMemoryRepository::<Ticket>::new()),
            validations: Arc::new(InMemoryRepository::<Validation>::new()),
            points_of_sale: Arc::new(InMemoryRepository::<PointOfSale>::new()),
            vehicles: Arc::new(InMemoryRepository::<Vehicle>::new()),
            service_periods: Arc::new(InMemoryRepository::<ServicePeriod>::new()),
            routes: Arc::new(InMemoryRepository::<Route>::new()),
            traversals: Arc::new(InMemoryRepository::<RouteTraversal>::new()),
        }
    }

    /// Abonos de una tarjeta, ordenados por inicio de ventana
    pub async fn passes_by_card(&self, card_id: Uuid) -> AppResult<Vec<Pass>> {
        let mut passes = self.passes.query(&move |p: &Pass| p.card_id == card_id).await?;
        passes.sort_by_key(|p| (p.start, p.issued_at));
        Ok(passes)
    }

    /// Historial de periodos de un vehículo, ordenado cronológicamente
    pub async fn periods_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<ServicePeriod>> {
        let mut periods = self
            .service_periods
            .query(&move |p: &ServicePeriod| p.vehicle_id == vehicle_id)
            .await?;
        periods.sort_by_key(|p| p.timeline_key());
        Ok(periods)
    }

    pub async fn validations_by_ticket(&self, ticket_id: Uuid) -> AppResult<Vec<Validation>> {
        let mut validations = self
            .validations
            .query(&move |v: &Validation| v.ticket_id == ticket_id)
            .await?;
        validations.sort_by_key(|v| v.validated_at);
        Ok(validations)
    }

    pub async fn traversals_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<RouteTraversal>> {
        let mut traversals = self
            .traversals
            .query(&move |t: &RouteTraversal| t.vehicle_id == vehicle_id)
            .await?;
        traversals.sort_by_key(|t| t.started_at);
        Ok(traversals)
    }

    /// Guardar un periodo comprobando que no pisa ningún otro del mismo vehículo
    pub async fn put_period(&self, period: ServicePeriod) -> AppResult<ServicePeriod> {
        let others = self.periods_by_vehicle(period.vehicle_id).await?;
        if let Some(clash) = others
            .iter()
            .find(|other| other.id != period.id && other.overlaps(&period))
        {
            return Err(overlap_error(
                period.vehicle_id,
                &format!("period {} overlaps period {}", period.id, clash.id),
            ));
        }
        self.service_periods.put(period).await
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::in_memory()
    }
}
