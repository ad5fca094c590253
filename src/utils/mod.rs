//! Utilidades del sistema
//!
//! Este módulo contiene el manejo de errores, el reloj inyectable
//! y los helpers de validación.

pub mod clock;
pub mod errors;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AppError, AppResult};
