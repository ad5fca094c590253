//! Configuración del proyecto
//!
//! Este módulo contiene la configuración leída del entorno y las reglas
//! temporales que de ella se derivan.

pub mod environment;
pub mod policy;

pub use environment::*;
pub use policy::*;
