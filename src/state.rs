//! Shared application state
//!
//! Este módulo define el estado compartido del cliente: configuración,
//! cliente del backend y almacenamiento de la sesión. Los servicios se
//! construyen a partir de él.

use std::sync::Arc;

use crate::cache::{FileSessionStore, SessionStorage};
use crate::client::{HttpRentalApi, RentalApi};
use crate::config::ClientConfig;
use crate::models::Session;
use crate::services::{
    AdminService, AuthService, BookingService, CatalogService, PaymentSessionInitiator,
    ReconciliationPoller,
};
use crate::utils::errors::ClientResult;

#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub api: Arc<dyn RentalApi>,
    pub sessions: Arc<dyn SessionStorage>,
}

impl AppState {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let api = HttpRentalApi::new(&config)?;
        let sessions = FileSessionStore::new(config.session_file.clone());
        Ok(Self {
            config,
            api: Arc::new(api),
            sessions: Arc::new(sessions),
        })
    }

    /// Estado con piezas ya construidas (tests, almacenamiento en memoria)
    pub fn with_parts(
        config: ClientConfig,
        api: Arc<dyn RentalApi>,
        sessions: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            config,
            api,
            sessions,
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.api), Arc::clone(&self.sessions))
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.api))
    }

    pub fn bookings(&self) -> BookingService {
        BookingService::new(Arc::clone(&self.api))
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(Arc::clone(&self.api))
    }

    pub fn payments(&self) -> PaymentSessionInitiator {
        PaymentSessionInitiator::new(Arc::clone(&self.api))
    }

    pub fn reconciliation(&self, session: Session, session_id: Option<String>) -> ReconciliationPoller {
        ReconciliationPoller::new(Arc::clone(&self.api), session, session_id, &self.config)
    }
}
