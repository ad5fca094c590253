//! Modelos del sistema
//!
//! Este módulo contiene las entidades y las reglas puras de ciclo de vida.
//! Ninguna función de aquí lee el reloj: el instante siempre llega como parámetro.

pub mod card;
pub mod pass;
pub mod point_of_sale;
pub mod rider;
pub mod route;
pub mod route_traversal;
pub mod service_period;
pub mod ticket;
pub mod validation;
pub mod vehicle;

pub use card::{Card, CardStatus};
pub use pass::{Pass, PassKind, PassStatus};
pub use point_of_sale::{PointOfSale, PointOfSaleKind};
pub use rider::{RegisterRiderRequest, Rider};
pub use route::{CreateRouteRequest, Route};
pub use route_traversal::RouteTraversal;
pub use service_period::{PeriodKind, ServicePeriod};
pub use ticket::{Ticket, TicketStatus};
pub use validation::Validation;
pub use vehicle::{FuelType, OperationalState, RegisterVehicleRequest, Vehicle, VehicleKind};
