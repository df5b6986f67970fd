//! Servicio de "mis reservas"
//!
//! Listado, cancelación con actualización local, descarga de facturas y
//! refresco periódico del listado del dashboard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::scheduled_task::TaskHandle;
use crate::client::RentalApi;
use crate::dto::Invoice;
use crate::models::{Booking, BookingStatus, Session};
use crate::utils::errors::{not_found_error, ClientError, ClientResult, Notice};
use crate::utils::validation::require_id;

/// Listado de reservas mostrado al usuario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingList {
    entries: Vec<Booking>,
}

impl BookingList {
    pub fn new(entries: Vec<Booking>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Booking] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, booking_id: &str) -> Option<&Booking> {
        self.entries.iter().find(|b| b.id == booking_id)
    }

    pub fn can_cancel(&self, booking_id: &str) -> bool {
        self.get(booking_id).map_or(false, Booking::can_cancel)
    }

    /// Marcar como cancelada sin recargar el listado
    pub fn mark_cancelled(&mut self, booking_id: &str) -> bool {
        match self.entries.iter_mut().find(|b| b.id == booking_id) {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                true
            }
            None => false,
        }
    }

    pub fn replace(&mut self, entries: Vec<Booking>) {
        self.entries = entries;
    }
}

pub type RefreshHandle = TaskHandle<Option<Vec<Booking>>, ()>;

#[derive(Clone)]
pub struct BookingService {
    api: Arc<dyn RentalApi>,
}

impl BookingService {
    pub fn new(api: Arc<dyn RentalApi>) -> Self {
        Self { api }
    }

    pub async fn my_bookings(&self, session: &Session) -> ClientResult<BookingList> {
        let bookings = self.api.my_bookings(session.token()).await.map_err(|e| {
            error!("❌ Error obteniendo reservas: {}", e);
            e
        })?;
        debug!("📋 {} reservas para {}", bookings.len(), session.user.name);
        Ok(BookingList::new(bookings))
    }

    /// Cancelar una reserva y reflejarlo en el listado local
    pub async fn cancel(
        &self,
        session: &Session,
        list: &mut BookingList,
        booking_id: &str,
    ) -> ClientResult<Notice> {
        require_id("booking", booking_id)?;
        let booking = list
            .get(booking_id)
            .ok_or_else(|| not_found_error("Booking", booking_id))?;
        if !booking.can_cancel() {
            return Err(ClientError::Conflict(
                "This booking has already been cancelled.".to_string(),
            ));
        }

        self.api
            .cancel_booking(session.token(), booking_id)
            .await
            .map_err(|e| {
                error!("❌ Error cancelando reserva {}: {}", booking_id, e);
                e
            })?;

        list.mark_cancelled(booking_id);
        info!("🗑️ Reserva {} cancelada", booking_id);
        Ok(Notice::success(
            "Booking Cancelled",
            "Your booking has been cancelled successfully.",
        ))
    }

    pub async fn download_invoice(&self, session: &Session, payment_id: &str) -> ClientResult<Invoice> {
        require_id("payment", payment_id)?;
        let bytes = self
            .api
            .download_invoice(session.token(), payment_id)
            .await
            .map_err(|e| {
                error!("❌ Error descargando factura {}: {}", payment_id, e);
                e
            })?;
        info!("📄 Factura {} descargada ({} bytes)", payment_id, bytes.len());
        Ok(Invoice::new(payment_id, bytes))
    }

    /// Refrescar el listado periódicamente hasta que se detenga el handle
    pub fn start_refresh(&self, session: Session, interval: Duration) -> RefreshHandle {
        let (tx, rx) = watch::channel(None);
        let api = Arc::clone(&self.api);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match api.my_bookings(session.token()).await {
                    Ok(bookings) => {
                        tx.send_replace(Some(bookings));
                    }
                    Err(ClientError::Unauthenticated(msg)) => {
                        error!("❌ Sesión inválida, se detiene el refresco: {}", msg);
                        break;
                    }
                    Err(e) => warn!("⚠️ Error refrescando reservas: {}", e),
                }
            }
        });

        TaskHandle::new("bookings-refresh", rx, task)
    }
}
