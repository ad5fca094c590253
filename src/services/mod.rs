//! Services module
//!
//! Este módulo contiene la orquestación del ciclo de vida: cada servicio lee
//! del almacenamiento, aplica la transición del modelo con el instante del
//! reloj inyectado y guarda el resultado.

pub mod card_service;
pub mod entity_locks;
pub mod fare_service;
pub mod fleet_service;
pub mod traversal_service;
pub mod validation_service;

pub use card_service::CardService;
pub use entity_locks::EntityLocks;
pub use fare_service::FareService;
pub use fleet_service::FleetService;
pub use traversal_service::{Punctuality, TraversalService};
pub use validation_service::ValidationService;
