use anyhow::Result;
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use transit_lifecycle::config::EnvironmentConfig;
use transit_lifecycle::models::{
    CreateRouteRequest, FuelType, PassKind, PointOfSale, RegisterRiderRequest,
    RegisterVehicleRequest, VehicleKind,
};
use transit_lifecycle::repositories::Storage;
use transit_lifecycle::services::{
    CardService, FareService, FleetService, TraversalService, ValidationService,
};
use transit_lifecycle::utils::clock::{Clock, ManualClock};
use transit_lifecycle::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚋 Transit Lifecycle - demo de una jornada");
    info!("================================================");

    // Reloj manual: la demo avanza el tiempo a mano
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let state = AppState::new(Storage::in_memory(), clock.clone(), config);

    if let Err(e) = run_day(&state, &clock).await {
        error!("❌ La demo terminó con error [{}]: {}", e.code(), e);
        return Err(e.into());
    }

    info!("👋 Demo terminada");
    Ok(())
}

async fn run_day(state: &AppState, clock: &ManualClock) -> transit_lifecycle::AppResult<()> {
    let cards = CardService::new(state);
    let fares = FareService::new(state);
    let fleet = FleetService::new(state);
    let traversals = TraversalService::new(state);
    let validations = ValidationService::new(state);

    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Stazione Centrale"))
        .await?;
    let reseller = fares
        .register_point_of_sale(PointOfSale::authorized_reseller("Via Garibaldi 12", "Tabacchi Bianchi"))
        .await?;

    let (rider, card) = cards
        .register_rider(RegisterRiderRequest {
            first_name: "Giulia".to_string(),
            last_name: "Conti".to_string(),
            birth_date: None,
        })
        .await?;
    let pass = fares
        .issue_pass(PassKind::Monthly, card.id, reseller.id, clock.now())
        .await?;

    let bus = fleet
        .register_vehicle(RegisterVehicleRequest {
            license_plate: "FT-482-KB".to_string(),
            kind: VehicleKind::Bus { fuel: FuelType::Hybrid },
            capacity: 95,
        })
        .await?;
    let route = traversals
        .create_route(CreateRouteRequest {
            name: "4".to_string(),
            origin_zone: "Centro".to_string(),
            terminus: "Ospedale Maggiore".to_string(),
            scheduled_minutes: 20,
            distance_km: Some(Decimal::new(74, 1)),
        })
        .await?;

    // Salida, marcaje y llegada
    let run = traversals.start(bus.id, route.id).await?;
    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await?;
    clock.advance(Duration::minutes(5));
    validations.validate_ticket(ticket.id, bus.id, Some(route.id)).await?;
    if let Err(e) = validations.validate_ticket(ticket.id, bus.id, Some(route.id)).await {
        info!("🔁 Segundo marcaje rechazado como se esperaba: {}", e.code());
    }
    traversals.record_passengers(run.id, Some(31), Some(12)).await?;
    clock.advance(Duration::minutes(18));
    let run = traversals.complete(run.id).await?;

    // Mantenimiento por la tarde
    clock.advance(Duration::hours(4));
    fleet.enter_maintenance(bus.id, "revisión de frenos").await?;
    clock.advance(Duration::hours(3));
    fleet
        .return_to_service(bus.id, "", Some(Decimal::new(38000, 2)))
        .await?;
    fleet.verify_history(bus.id).await?;

    let summary = json!({
        "rider": rider.full_name(),
        "card_status": cards.card_status(card.id).await?,
        "pass_status": fares.pass_status(pass.id).await?,
        "ticket_status": fares.ticket_status(ticket.id).await?,
        "traversal": {
            "actual_minutes": run.actual_minutes,
            "delay_minutes": run.delay_minutes,
            "net_passengers": run.net_passengers(),
        },
        "service_periods": fleet.service_history(bus.id).await?.len(),
    });
    info!("📊 Resumen: {}", summary);
    Ok(())
}
