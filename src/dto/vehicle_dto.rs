use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filtros del catálogo. Los campos vacíos no se envían.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleFilters {
    pub keyword: Option<String>,
    pub vehicle_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl VehicleFilters {
    /// Parámetros de query con los nombres que espera el backend
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("keyword", &self.keyword),
            ("type", &self.vehicle_type),
            ("location", &self.location),
        ];
        let prices = [("minPrice", &self.min_price), ("maxPrice", &self.max_price)];

        text.into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (key, v.to_string()))
            })
            .chain(
                prices
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|v| (key, v.normalize().to_string()))),
            )
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}
