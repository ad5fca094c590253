use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use transit_lifecycle::models::{
    CardStatus, CreateRouteRequest, FuelType, OperationalState, PassKind, PassStatus,
    PeriodKind, PointOfSale, RegisterRiderRequest, RegisterVehicleRequest, TicketStatus,
    VehicleKind,
};
use transit_lifecycle::services::{
    CardService, FareService, FleetService, TraversalService, ValidationService,
};
use transit_lifecycle::utils::clock::{Clock, ManualClock};
use transit_lifecycle::{AppError, AppState};

#[tokio::test]
async fn test_ticket_valid_for_ninety_minutes() {
    let (state, clock) = create_test_state();
    let fares = FareService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Porta Susa"))
        .await
        .unwrap();

    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await.unwrap();
    assert_eq!(ticket.price, Decimal::new(150, 2));
    assert!(ticket.is_valid(start() + Duration::minutes(89)));
    assert!(!ticket.is_valid(start() + Duration::minutes(91)));

    clock.advance(Duration::minutes(91));
    assert_eq!(fares.ticket_status(ticket.id).await.unwrap(), TicketStatus::Expired);
}

#[tokio::test]
async fn test_validation_is_recorded_once() {
    let (state, clock) = create_test_state();
    let fares = FareService::new(&state);
    let validations = ValidationService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Porta Susa"))
        .await
        .unwrap();
    let bus = register_bus(&state, "AA-100-BB").await;
    let route = create_route(&state, 20).await;

    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await.unwrap();
    clock.advance(Duration::minutes(10));
    let validation = validations
        .validate_ticket(ticket.id, bus, Some(route))
        .await
        .unwrap();
    let validated_at = clock.now();

    clock.advance(Duration::minutes(1));
    let again = validations.validate_ticket(ticket.id, bus, None).await;
    assert!(matches!(again, Err(AppError::AlreadyValidated { .. })));

    let stored = fares.get_ticket(ticket.id).await.unwrap();
    assert_eq!(stored.validated_at, Some(validated_at));
    assert_eq!(stored.validation_id, Some(validation.id));

    let records = validations.validations_for_ticket(ticket.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].route_id, Some(route));
}

#[tokio::test]
async fn test_expired_ticket_cannot_be_validated() {
    let (state, clock) = create_test_state();
    let fares = FareService::new(&state);
    let validations = ValidationService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Lingotto"))
        .await
        .unwrap();
    let bus = register_bus(&state, "AA-100-BB").await;

    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await.unwrap();
    clock.advance(Duration::minutes(90));
    let result = validations.validate_ticket(ticket.id, bus, None).await;
    assert!(matches!(result, Err(AppError::Expired { .. })));
    assert!(validations.validations_for_ticket(ticket.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_requires_known_vehicle() {
    let (state, _clock) = create_test_state();
    let fares = FareService::new(&state);
    let validations = ValidationService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Lingotto"))
        .await
        .unwrap();

    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await.unwrap();
    let result = validations
        .validate_ticket(ticket.id, uuid::Uuid::new_v4(), None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(fares.ticket_status(ticket.id).await.unwrap(), TicketStatus::Valid);
}

#[tokio::test]
async fn test_mark_validation_invalid_keeps_audit_record() {
    let (state, _clock) = create_test_state();
    let fares = FareService::new(&state);
    let validations = ValidationService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Lingotto"))
        .await
        .unwrap();
    let bus = register_bus(&state, "AA-100-BB").await;
    let ticket = fares.issue_ticket(Decimal::new(150, 2), machine.id).await.unwrap();
    let validation = validations.validate_ticket(ticket.id, bus, None).await.unwrap();

    assert!(validations.mark_invalid(validation.id, "  ").await.is_err());
    let corrected = validations
        .mark_invalid(validation.id, "duplicate punch from faulty reader")
        .await
        .unwrap();
    assert!(!corrected.valid);
    assert_eq!(corrected.ticket_id, ticket.id);
    assert_eq!(corrected.vehicle_id, bus);
    assert_eq!(validations.validations_for_vehicle(bus).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_weekly_pass_window() {
    let (state, clock) = create_test_state();
    let cards = CardService::new(&state);
    let fares = FareService::new(&state);
    let reseller = fares
        .register_point_of_sale(PointOfSale::authorized_reseller("Via Nizza 3", "Edicola Nizza"))
        .await
        .unwrap();
    let (_, card) = cards.register_rider(rider_request()).await.unwrap();

    let day = start() + Duration::days(1);
    let pass = fares
        .issue_pass(PassKind::Weekly, card.id, reseller.id, day)
        .await
        .unwrap();
    assert_eq!(pass.end, day + Duration::days(7));
    assert_eq!(fares.pass_status(pass.id).await.unwrap(), PassStatus::Pending);

    clock.set(day + Duration::days(7));
    assert!(fares.is_pass_valid(pass.id).await.unwrap());

    clock.set(day + Duration::days(8));
    assert!(!fares.is_pass_valid(pass.id).await.unwrap());
    assert_eq!(fares.pass_status(pass.id).await.unwrap(), PassStatus::Expired);
    assert!(matches!(
        fares.reactivate_pass(pass.id).await,
        Err(AppError::PassExpired { .. })
    ));
}

#[tokio::test]
async fn test_card_deactivation_flips_pass_validity() {
    let (state, _clock) = create_test_state();
    let cards = CardService::new(&state);
    let fares = FareService::new(&state);
    let reseller = fares
        .register_point_of_sale(PointOfSale::authorized_reseller("Via Nizza 3", "Edicola Nizza"))
        .await
        .unwrap();
    let (rider, card) = cards.register_rider(rider_request()).await.unwrap();
    assert_eq!(rider.card_id, Some(card.id));

    let pass = fares
        .issue_pass(PassKind::Monthly, card.id, reseller.id, start())
        .await
        .unwrap();
    assert!(fares.is_pass_valid(pass.id).await.unwrap());

    cards.deactivate_card(card.id).await.unwrap();
    assert!(!fares.is_pass_valid(pass.id).await.unwrap());
    assert_eq!(fares.pass_status(pass.id).await.unwrap(), PassStatus::CardInvalid);
    // El abono en sí no ha cambiado
    assert!(fares.get_pass(pass.id).await.unwrap().active);

    cards.renew_card(card.id).await.unwrap();
    assert!(fares.is_pass_valid(pass.id).await.unwrap());
    assert_eq!(cards.valid_passes_for_card(card.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_pass_needs_card_valid_at_start() {
    let (state, _clock) = create_test_state();
    let cards = CardService::new(&state);
    let fares = FareService::new(&state);
    let reseller = fares
        .register_point_of_sale(PointOfSale::authorized_reseller("Via Nizza 3", "Edicola Nizza"))
        .await
        .unwrap();
    let (_, card) = cards.register_rider(rider_request()).await.unwrap();

    let beyond_expiry = card.expires_at + Duration::days(1);
    let result = fares
        .issue_pass(PassKind::Weekly, card.id, reseller.id, beyond_expiry)
        .await;
    assert!(matches!(result, Err(AppError::InvalidCard { .. })));
    assert!(cards.passes_for_card(card.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_card_expiry_and_renewal() {
    let (state, clock) = create_test_state();
    let cards = CardService::new(&state);
    let (_, card) = cards.register_rider(rider_request()).await.unwrap();

    clock.set(card.expires_at + Duration::seconds(1));
    assert_eq!(cards.card_status(card.id).await.unwrap(), CardStatus::Expired);
    assert!(!cards.is_card_valid(card.id).await.unwrap());

    let renewed = cards.renew_card(card.id).await.unwrap();
    assert!(renewed.expires_at > card.expires_at);
    assert_eq!(cards.get_card(card.id).await.unwrap(), renewed);
    assert_eq!(cards.card_status(card.id).await.unwrap(), CardStatus::Active);

    let rider_id = card.rider_id;
    assert!(matches!(
        cards.issue_card(rider_id).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_out_of_service_machine_cannot_sell() {
    let (state, _clock) = create_test_state();
    let fares = FareService::new(&state);
    let machine = fares
        .register_point_of_sale(PointOfSale::vending_machine("Vanchiglia"))
        .await
        .unwrap();

    fares.set_vending_machine_in_service(machine.id, false).await.unwrap();
    let result = fares.issue_ticket(Decimal::new(150, 2), machine.id).await;
    assert!(matches!(result, Err(AppError::PointOfSaleUnavailable { .. })));

    fares.set_vending_machine_in_service(machine.id, true).await.unwrap();
    assert!(fares.issue_ticket(Decimal::new(150, 2), machine.id).await.is_ok());
}

#[tokio::test]
async fn test_maintenance_round_trip_history() {
    let (state, clock) = create_test_state();
    let fleet = FleetService::new(&state);
    let bus = register_bus(&state, "CC-200-DD").await;

    let t1 = clock.advance(Duration::hours(2));
    fleet.enter_maintenance(bus, "cambio pneumatici").await.unwrap();
    // Segunda llamada: ya en mantenimiento, no hace nada
    fleet.enter_maintenance(bus, "otra nota").await.unwrap();
    let open = fleet.open_maintenance_period(bus).await.unwrap().unwrap();
    assert_eq!(open.start, t1);

    fleet.record_maintenance_cost(bus, Decimal::new(12000, 2)).await.unwrap();
    let t2 = clock.advance(Duration::hours(6));
    let vehicle = fleet.return_to_service(bus, "", None).await.unwrap();
    assert_eq!(vehicle.state, OperationalState::InService);
    assert!(fleet.open_maintenance_period(bus).await.unwrap().is_none());

    let history = fleet.service_history(bus).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].kind, PeriodKind::Service);
    assert_eq!(history[0].end, Some(t1));
    assert_eq!(history[1].kind, PeriodKind::Maintenance);
    assert_eq!((history[1].start, history[1].end), (t1, Some(t2)));
    assert_eq!(history[1].cost, Some(Decimal::new(12000, 2)));
    assert_eq!(history[2].kind, PeriodKind::Service);
    assert!(history[2].is_open());
    assert_eq!(history.iter().filter(|p| p.is_open()).count(), 1);
    fleet.verify_history(bus).await.unwrap();
}

#[tokio::test]
async fn test_late_traversal_and_double_completion() {
    let (state, clock) = create_test_state();
    let traversals = TraversalService::new(&state);
    let bus = register_bus(&state, "EE-300-FF").await;
    let route = create_route(&state, 20).await;

    let run = traversals.start(bus, route).await.unwrap();
    traversals.record_passengers(run.id, Some(10), None).await.unwrap();
    clock.advance(Duration::minutes(23));
    let run = traversals.complete(run.id).await.unwrap();
    assert_eq!(run.delay_minutes, Some(3));
    assert!(run.is_late());
    assert!(!run.is_on_time());
    assert_eq!(run.net_passengers(), Some(10));

    let punctuality = traversals.punctuality(run.id).await.unwrap().unwrap();
    assert_eq!(punctuality.delay_minutes, 3);
    assert!(punctuality.late && !punctuality.on_time);

    clock.advance(Duration::minutes(5));
    let again = traversals.complete(run.id).await;
    assert!(matches!(again, Err(AppError::AlreadyCompleted { .. })));
    let stored = traversals.traversals_for_vehicle(bus).await.unwrap();
    assert_eq!(stored[0].delay_minutes, Some(3));
}

#[tokio::test]
async fn test_traversal_requires_vehicle_in_service_and_active_route() {
    let (state, _clock) = create_test_state();
    let traversals = TraversalService::new(&state);
    let fleet = FleetService::new(&state);
    let bus = register_bus(&state, "GG-400-HH").await;
    let route = create_route(&state, 15).await;

    traversals.set_route_active(route, false).await.unwrap();
    assert!(matches!(traversals.start(bus, route).await, Err(AppError::Unavailable(_))));
    traversals.set_route_active(route, true).await.unwrap();

    fleet.enter_maintenance(bus, "").await.unwrap();
    assert!(matches!(traversals.start(bus, route).await, Err(AppError::Unavailable(_))));
    assert!(traversals.punctuality(uuid::Uuid::new_v4()).await.is_err());
}

// Helpers

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 7, 0, 0).unwrap()
}

fn create_test_state() -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let state = AppState::in_memory(clock.clone());
    (state, clock)
}

fn rider_request() -> RegisterRiderRequest {
    RegisterRiderRequest {
        first_name: "Marco".to_string(),
        last_name: "Ferrero".to_string(),
        birth_date: None,
    }
}

async fn register_bus(state: &AppState, plate: &str) -> uuid::Uuid {
    FleetService::new(state)
        .register_vehicle(RegisterVehicleRequest {
            license_plate: plate.to_string(),
            kind: VehicleKind::Bus { fuel: FuelType::Cng },
            capacity: 85,
        })
        .await
        .unwrap()
        .id
}

async fn create_route(state: &AppState, scheduled_minutes: i64) -> uuid::Uuid {
    TraversalService::new(state)
        .create_route(CreateRouteRequest {
            name: "15".to_string(),
            origin_zone: "Sassi".to_string(),
            terminus: "Piazza Statuto".to_string(),
            scheduled_minutes,
            distance_km: None,
        })
        .await
        .unwrap()
        .id
}
