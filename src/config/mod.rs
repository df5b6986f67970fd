//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración
//! del cliente HTTP y del poller de reconciliación.

pub mod environment;

pub use environment::*;
