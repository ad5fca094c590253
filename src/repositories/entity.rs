//! Identidad de las entidades persistidas

use uuid::Uuid;

use crate::models::{
    Card, Pass, PointOfSale, Rider, Route, RouteTraversal, ServicePeriod, Ticket, Validation,
    Vehicle,
};

/// Registro que el almacenamiento puede guardar por id
pub trait Entity: Clone + Send + Sync + 'static {
    /// Nombre del tipo en mensajes de error y logs
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

macro_rules! impl_entity {
    ($($ty:ty => $kind:literal),+ $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: &'static str = $kind;

                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )+
    };
}

impl_entity! {
    Rider => "Rider",
    Card => "Card",
    Pass => "Pass",
    Ticket => "Ticket",
    Validation => "Validation",
    PointOfSale => "PointOfSale",
    Vehicle => "Vehicle",
    ServicePeriod => "ServicePeriod",
    Route => "Route",
    RouteTraversal => "RouteTraversal",
}
