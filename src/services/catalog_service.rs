//! Servicio de catálogo
//!
//! Listado de vehículos con filtros y reseñas públicas.

use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use super::availability_service::AvailabilityCalculator;
use crate::client::RentalApi;
use crate::dto::{NewReviewRequest, VehicleFilters};
use crate::models::{Review, Session, Vehicle};
use crate::utils::errors::{ClientError, ClientResult, Notice};
use crate::utils::validation::{require_id, validate_filters};

#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn RentalApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn RentalApi>) -> Self {
        Self { api }
    }

    pub async fn list_vehicles(&self, filters: &VehicleFilters) -> ClientResult<Vec<Vehicle>> {
        validate_filters(filters)?;
        let vehicles = self.api.list_vehicles(filters).await.map_err(|e| {
            error!("❌ Error cargando vehículos: {}", e);
            e
        })?;
        info!("🚗 {} vehículos con filtros {:?}", vehicles.len(), filters.to_query());
        Ok(vehicles)
    }

    pub async fn vehicle(&self, vehicle_id: &str) -> ClientResult<Vehicle> {
        require_id("vehicle", vehicle_id)?;
        self.api.get_vehicle(vehicle_id).await
    }

    /// Vehículo junto con su disponibilidad actual. Si falla la recarga se
    /// conservan las fechas embebidas en el vehículo.
    pub async fn vehicle_with_availability(
        &self,
        vehicle_id: &str,
    ) -> ClientResult<(Vehicle, AvailabilityCalculator)> {
        let vehicle = self.vehicle(vehicle_id).await?;
        let mut availability =
            AvailabilityCalculator::with_ranges(vehicle.id.clone(), vehicle.booked_dates.clone());
        if let Err(e) = availability.refresh(self.api.as_ref()).await {
            warn!(
                "⚠️ No se pudieron cargar las fechas reservadas de {}: {}",
                vehicle.id, e
            );
        }
        Ok((vehicle, availability))
    }

    pub async fn reviews(&self, vehicle_id: &str) -> ClientResult<Vec<Review>> {
        require_id("vehicle", vehicle_id)?;
        self.api.vehicle_reviews(vehicle_id).await
    }

    /// Enviar una reseña; queda pendiente de moderación
    pub async fn submit_review(
        &self,
        session: Option<&Session>,
        vehicle_id: &str,
        rating: u8,
        comment: &str,
    ) -> ClientResult<Notice> {
        let session = session.filter(|s| s.is_valid()).ok_or_else(|| {
            ClientError::Unauthenticated("Please log in to leave a review.".to_string())
        })?;
        require_id("vehicle", vehicle_id)?;

        let request = NewReviewRequest {
            rating,
            comment: comment.trim().to_string(),
        };
        request.validate()?;

        self.api
            .submit_review(session.token(), vehicle_id, &request)
            .await
            .map_err(|e| {
                error!("❌ Error enviando reseña para {}: {}", vehicle_id, e);
                e
            })?;

        info!("⭐ Reseña enviada para {}", vehicle_id);
        Ok(Notice::success("Submitted", "Your review was sent for approval."))
    }
}
