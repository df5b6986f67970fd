//! Servicio de administración
//!
//! Superficies de sólo lectura del panel de administración y moderación
//! de reseñas. Requiere una sesión de administrador.

use std::sync::Arc;

use tracing::{error, info};

use crate::client::RentalApi;
use crate::models::{AdminOverview, Booking, DashboardStats, Review, Session, UserProfile, Vehicle};
use crate::utils::errors::{ClientError, ClientResult, Notice};
use crate::utils::validation::require_id;

#[derive(Clone)]
pub struct AdminService {
    api: Arc<dyn RentalApi>,
}

impl AdminService {
    pub fn new(api: Arc<dyn RentalApi>) -> Self {
        Self { api }
    }

    /// Verificar la sesión sin tocar la red
    fn authorize<'a>(&self, session: &'a Session) -> ClientResult<&'a str> {
        if !session.is_valid() {
            return Err(ClientError::Unauthenticated(
                "Please login as admin".to_string(),
            ));
        }
        if !session.is_admin() {
            return Err(ClientError::Forbidden(format!(
                "{} is not an administrator",
                session.user.name
            )));
        }
        Ok(session.token())
    }

    pub async fn dashboard(&self, session: &Session) -> ClientResult<DashboardStats> {
        let token = self.authorize(session)?;
        self.api.admin_dashboard(token).await
    }

    pub async fn vehicles(&self, session: &Session) -> ClientResult<Vec<Vehicle>> {
        let token = self.authorize(session)?;
        self.api.admin_vehicles(token).await
    }

    pub async fn bookings(&self, session: &Session) -> ClientResult<Vec<Booking>> {
        let token = self.authorize(session)?;
        self.api.admin_bookings(token).await
    }

    pub async fn users(&self, session: &Session) -> ClientResult<Vec<UserProfile>> {
        let token = self.authorize(session)?;
        self.api.admin_users(token).await
    }

    pub async fn pending_reviews(&self, session: &Session) -> ClientResult<Vec<Review>> {
        let token = self.authorize(session)?;
        self.api.pending_reviews(token).await
    }

    /// Cargar todas las vistas en paralelo
    pub async fn overview(&self, session: &Session) -> ClientResult<AdminOverview> {
        let token = self.authorize(session)?;
        let (stats, vehicles, bookings, users, pending_reviews) = futures::try_join!(
            self.api.admin_dashboard(token),
            self.api.admin_vehicles(token),
            self.api.admin_bookings(token),
            self.api.admin_users(token),
            self.api.pending_reviews(token),
        )
        .map_err(|e| {
            error!("❌ Error cargando el panel de administración: {}", e);
            e
        })?;

        Ok(AdminOverview {
            stats,
            vehicles,
            bookings,
            users,
            pending_reviews,
        })
    }

    /// Aprobar o rechazar una reseña pendiente
    pub async fn moderate_review(
        &self,
        session: &Session,
        pending: &mut Vec<Review>,
        review_id: &str,
        approved: bool,
    ) -> ClientResult<Notice> {
        let token = self.authorize(session)?;
        require_id("review", review_id)?;

        self.api
            .moderate_review(token, review_id, approved)
            .await
            .map_err(|e| {
                error!("❌ Error moderando reseña {}: {}", review_id, e);
                e
            })?;

        pending.retain(|r| r.id != review_id);
        info!(
            "🛡️ Reseña {} {}",
            review_id,
            if approved { "aprobada" } else { "rechazada" }
        );
        Ok(Notice::success(
            if approved { "Approved!" } else { "Rejected!" },
            "Review moderation successful.",
        ))
    }
}
