//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de formularios y filtros antes de enviarlos al backend.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::dto::vehicle_dto::VehicleFilters;
use crate::utils::errors::{ClientError, ClientResult};

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un identificador de recurso antes de usarlo en una ruta
pub fn require_id(kind: &str, value: &str) -> ClientResult<()> {
    validate_not_empty(value)
        .map_err(|_| ClientError::MissingInput(format!("A {} id is required.", kind)))
}

/// Validar que un precio no sea negativo
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut error = ValidationError::new("price");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar los filtros del catálogo
pub fn validate_filters(filters: &VehicleFilters) -> ClientResult<()> {
    for price in [&filters.min_price, &filters.max_price].into_iter().flatten() {
        validate_price(price).map_err(|_| {
            ClientError::MissingInput("Prices must be zero or greater.".to_string())
        })?;
    }

    if let (Some(min), Some(max)) = (filters.min_price, filters.max_price) {
        if min > max {
            return Err(ClientError::MissingInput(
                "Minimum price cannot exceed maximum price.".to_string(),
            ));
        }
    }

    Ok(())
}
