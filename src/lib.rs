//! Motor de ciclo de vida para títulos de transporte y vehículos
//!
//! Decide, para cualquier entidad y cualquier instante, si un billete, abono,
//! tarjeta o vehículo es utilizable, y aplica las transiciones de estado entre
//! emitido, válido, consumido/caducado y anulado.

pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
