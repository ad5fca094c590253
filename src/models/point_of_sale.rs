//! Modelo de PointOfSale
//!
//! Punto de emisión de billetes y abonos: máquina expendedora o revendedor
//! autorizado. Los campos comunes van en el struct y lo específico en `kind`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointOfSaleKind {
    VendingMachine { in_service: bool },
    AuthorizedReseller { business_name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointOfSale {
    pub id: Uuid,
    pub location: String,
    pub active: bool,
    pub kind: PointOfSaleKind,
}

impl PointOfSale {
    pub fn vending_machine(location: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            location: location.to_string(),
            active: true,
            kind: PointOfSaleKind::VendingMachine { in_service: true },
        }
    }

    pub fn authorized_reseller(location: &str, business_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            location: location.to_string(),
            active: true,
            kind: PointOfSaleKind::AuthorizedReseller {
                business_name: business_name.to_string(),
            },
        }
    }

    /// Puede emitir si está activo y, si es una máquina, está en servicio
    pub fn can_issue(&self) -> bool {
        match &self.kind {
            PointOfSaleKind::VendingMachine { in_service } => self.active && *in_service,
            PointOfSaleKind::AuthorizedReseller { .. } => self.active,
        }
    }

    /// Cambiar el estado de servicio de una máquina; devuelve false para revendedores
    pub fn set_in_service(&mut self, value: bool) -> bool {
        match &mut self.kind {
            PointOfSaleKind::VendingMachine { in_service } => {
                *in_service = value;
                true
            }
            PointOfSaleKind::AuthorizedReseller { .. } => false,
        }
    }
}
