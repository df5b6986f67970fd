//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como lo devuelve el catálogo.
//! Es inmutable para el cliente: sólo el backend lo modifica.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::booking::BookedRange;

fn default_available() -> bool {
    true
}

/// Vehicle del catálogo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "type", default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub price_per_day: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub booked_dates: Vec<BookedRange>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Datos mínimos de un vehículo embebido en otra entidad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price_per_day: Option<Decimal>,
}

/// Referencia a un vehículo: poblada o sólo el identificador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleRef {
    Populated(Box<VehicleSummary>),
    Id(String),
}

impl VehicleRef {
    pub fn id(&self) -> &str {
        match self {
            VehicleRef::Populated(v) => &v.id,
            VehicleRef::Id(id) => id,
        }
    }
}
