//! Modelo de Rider
//!
//! Titular de una tarjeta (relación 1:1).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_not_empty;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rider {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub card_id: Option<Uuid>,
}

/// Request para registrar un nuevo viajero
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRiderRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    pub birth_date: Option<NaiveDate>,
}

impl Rider {
    pub fn from_request(request: RegisterRiderRequest) -> AppResult<Self> {
        request.validate()?;

        for (field, value) in [
            ("first_name", &request.first_name),
            ("last_name", &request.last_name),
        ] {
            if validate_not_empty(value).is_err() {
                return Err(validation_error(field, "must not be blank"));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            birth_date: request.birth_date,
            card_id: None,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
