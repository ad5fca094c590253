//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del entorno. Todas las claves tienen un
//! valor por defecto, así que un entorno vacío es una configuración válida.

use std::env;
use std::str::FromStr;

use chrono::Duration;

use super::policy::LifecyclePolicy;
use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub log_level: tracing::Level,
    pub ticket_validity_minutes: i64,
    pub card_term_months: u32,
    pub punctuality_tolerance_minutes: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let policy = LifecyclePolicy::default();
        Self {
            environment: "development".to_string(),
            log_level: tracing::Level::INFO,
            ticket_validity_minutes: policy.ticket_validity.num_minutes(),
            card_term_months: policy.card_term_months,
            punctuality_tolerance_minutes: policy.punctuality_tolerance_minutes,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
            ticket_validity_minutes: parse_var(
                "TICKET_VALIDITY_MINUTES",
                defaults.ticket_validity_minutes,
            )?,
            card_term_months: parse_var("CARD_TERM_MONTHS", defaults.card_term_months)?,
            punctuality_tolerance_minutes: parse_var(
                "PUNCTUALITY_TOLERANCE_MINUTES",
                defaults.punctuality_tolerance_minutes,
            )?,
        };

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> AppResult<()> {
        if self.ticket_validity_minutes <= 0 {
            return Err(AppError::Config(
                "TICKET_VALIDITY_MINUTES must be greater than 0".to_string(),
            ));
        }
        if self.card_term_months == 0 {
            return Err(AppError::Config(
                "CARD_TERM_MONTHS must be greater than 0".to_string(),
            ));
        }
        if self.punctuality_tolerance_minutes < 0 {
            return Err(AppError::Config(
                "PUNCTUALITY_TOLERANCE_MINUTES must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Reglas de ciclo de vida derivadas de la configuración
    pub fn policy(&self) -> LifecyclePolicy {
        LifecyclePolicy {
            ticket_validity: Duration::minutes(self.ticket_validity_minutes),
            card_term_months: self.card_term_months,
            punctuality_tolerance_minutes: self.punctuality_tolerance_minutes,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
