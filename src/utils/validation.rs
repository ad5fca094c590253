//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar los datos de entrada
//! de las operaciones de emisión y registro.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    // Grupos alfanuméricos separados por un guion o espacio: "AB-123-CD", "TR 0042"
    static ref PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]+(?:[- ][A-Z0-9]+)*$").expect("plate regex is valid");
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Normalizar una matrícula: espacios exteriores fuera y mayúsculas
pub fn normalize_license_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validar formato de matrícula de vehículo (ya normalizada)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let alphanumerics = value.chars().filter(|c| c.is_ascii_alphanumeric()).count();
    if !(2..=10).contains(&alphanumerics) || !PLATE_REGEX.is_match(value) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"2-10 alphanumerics, groups split by '-' or ' '".to_string());
        return Err(error);
    }
    Ok(())
}
