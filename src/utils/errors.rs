//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del motor de ciclo de vida.
//! Todos son recuperables por el llamador: ninguno termina el proceso.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ticket {ticket_id} has already been validated")]
    AlreadyValidated { ticket_id: Uuid },

    #[error("Ticket {ticket_id} expired at {expired_at}")]
    Expired {
        ticket_id: Uuid,
        expired_at: DateTime<Utc>,
    },

    #[error("Card {card_id} is not valid at {at}")]
    InvalidCard { card_id: Uuid, at: DateTime<Utc> },

    #[error("Pass {pass_id} ended at {ended_at}")]
    PassExpired {
        pass_id: Uuid,
        ended_at: DateTime<Utc>,
    },

    #[error("Route traversal {traversal_id} is already completed")]
    AlreadyCompleted { traversal_id: Uuid },

    #[error("Service period overlap for vehicle {vehicle_id}: {message}")]
    Overlap { vehicle_id: Uuid, message: String },

    #[error("Service period {period_id} is already closed")]
    PeriodAlreadyClosed { period_id: Uuid },

    #[error("Invalid interval: end {end} is before start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Point of sale {point_of_sale_id} cannot issue fare media")]
    PointOfSaleUnavailable { point_of_sale_id: Uuid },

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Código estable para los llamadores que exponen el error a un usuario
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyValidated { .. } => "ALREADY_VALIDATED",
            AppError::Expired { .. } => "EXPIRED",
            AppError::InvalidCard { .. } => "INVALID_CARD",
            AppError::PassExpired { .. } => "PASS_EXPIRED",
            AppError::AlreadyCompleted { .. } => "ALREADY_COMPLETED",
            AppError::Overlap { .. } => "OVERLAP",
            AppError::PeriodAlreadyClosed { .. } => "PERIOD_ALREADY_CLOSED",
            AppError::InvalidInterval { .. } => "INVALID_INTERVAL",
            AppError::PointOfSaleUnavailable { .. } => "POINT_OF_SALE_UNAVAILABLE",
            AppError::Unavailable(_) => "UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Solo los fallos del almacenamiento merecen un reintento
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &Uuid) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solapamiento
pub fn overlap_error(vehicle_id: Uuid, message: &str) -> AppError {
    AppError::Overlap {
        vehicle_id,
        message: message.to_string(),
    }
}

/// Función helper para crear errores de almacenamiento
pub fn storage_error(message: &str) -> AppError {
    AppError::Storage(message.to_string())
}
