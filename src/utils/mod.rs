//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y tokens de sesión.

pub mod errors;
pub mod jwt;
pub mod validation;

pub use errors::*;
