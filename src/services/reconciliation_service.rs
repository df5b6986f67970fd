//! Poller de reconciliación
//!
//! Tras volver del proveedor de pago, la reserva la crea un webhook en el
//! backend que puede llegar más tarde que el navegador. El poller consulta
//! "mis reservas" a intervalo fijo hasta encontrar la reserva de la sesión
//! o agotar los intentos. Nunca hace un bucle infinito.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::scheduled_task::TaskHandle;
use crate::client::RentalApi;
use crate::config::ClientConfig;
use crate::models::{Booking, Session};
use crate::utils::errors::{ClientError, Notice};

#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationStatus {
    Loading { attempt: u32 },
    Found(Box<Booking>),
    /// Intentos agotados sin encontrar la reserva
    NotFound,
    /// Sin identificador de sesión: confirmación optimista
    Confirmed,
    /// El backend rechazó el token: hay que volver a iniciar sesión
    Unauthenticated,
}

impl ReconciliationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReconciliationStatus::Loading { .. })
    }

    pub fn notice(&self) -> Notice {
        match self {
            ReconciliationStatus::Loading { .. } => {
                Notice::info("Confirming Booking", "Waiting for payment confirmation...")
            }
            ReconciliationStatus::Found(booking) => Notice::success(
                "Payment Successful!",
                format!(
                    "Your booking for {} has been confirmed.",
                    booking.vehicle_label()
                ),
            ),
            ReconciliationStatus::NotFound => Notice::warning(
                "Booking Not Found Yet",
                "We could not find your booking yet. Please check your email or contact support.",
            ),
            ReconciliationStatus::Confirmed => Notice::success(
                "Payment Successful!",
                "Your booking has been confirmed and added to your dashboard.",
            ),
            ReconciliationStatus::Unauthenticated => {
                ClientError::Unauthenticated(String::new()).notice()
            }
        }
    }
}

pub type PollerHandle = TaskHandle<ReconciliationStatus>;

/// Extraer `session_id` de la URL de retorno del checkout
pub fn session_id_from_redirect(redirect_url: &str) -> Option<String> {
    let url = Url::parse(redirect_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}

/// Buscar la reserva creada por una sesión de pago
pub fn find_booking_for_session(bookings: Vec<Booking>, session_id: &str) -> Option<Booking> {
    bookings
        .into_iter()
        .find(|b| b.payment_session_id() == Some(session_id))
}

pub struct ReconciliationPoller {
    api: Arc<dyn RentalApi>,
    session: Session,
    session_id: Option<String>,
    interval: Duration,
    max_attempts: u32,
}

impl ReconciliationPoller {
    pub fn new(
        api: Arc<dyn RentalApi>,
        session: Session,
        session_id: Option<String>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            api,
            session,
            session_id: session_id.filter(|id| !id.trim().is_empty()),
            interval: config.reconcile_interval,
            max_attempts: config.reconcile_max_attempts.max(1),
        }
    }

    pub fn with_schedule(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.interval = interval;
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Lanzar el poller en segundo plano
    pub fn start(self) -> PollerHandle {
        let (tx, rx) = watch::channel(ReconciliationStatus::Loading { attempt: 0 });
        let task = tokio::spawn(async move { self.poll(tx).await });
        TaskHandle::new("reconciliation", rx, task)
    }

    /// Ejecutar el poller en la tarea actual hasta un estado terminal
    pub async fn run(self) -> ReconciliationStatus {
        let (tx, _rx) = watch::channel(ReconciliationStatus::Loading { attempt: 0 });
        self.poll(tx).await
    }

    async fn poll(self, tx: watch::Sender<ReconciliationStatus>) -> ReconciliationStatus {
        let Some(session_id) = self.session_id.clone() else {
            info!("✅ Retorno sin session_id, confirmación optimista");
            tx.send_replace(ReconciliationStatus::Confirmed);
            return ReconciliationStatus::Confirmed;
        };

        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 1..=self.max_attempts {
            ticker.tick().await;
            tx.send_replace(ReconciliationStatus::Loading { attempt });

            match self.api.my_bookings(self.session.token()).await {
                Ok(bookings) => {
                    if let Some(booking) = find_booking_for_session(bookings, &session_id) {
                        info!(
                            "✅ Reserva {} encontrada para sesión {} (intento {})",
                            booking.id, session_id, attempt
                        );
                        let status = ReconciliationStatus::Found(Box::new(booking));
                        tx.send_replace(status.clone());
                        return status;
                    }
                    info!(
                        "⏳ Sesión {} aún sin reserva (intento {}/{})",
                        session_id, attempt, self.max_attempts
                    );
                }
                Err(ClientError::Unauthenticated(msg)) => {
                    error!("❌ Sesión inválida durante la reconciliación: {}", msg);
                    tx.send_replace(ReconciliationStatus::Unauthenticated);
                    return ReconciliationStatus::Unauthenticated;
                }
                Err(e) => {
                    warn!(
                        "⚠️ Error consultando reservas (intento {}/{}): {}",
                        attempt, self.max_attempts, e
                    );
                }
            }
        }

        warn!("⚠️ No se encontró reserva para la sesión {}", session_id);
        tx.send_replace(ReconciliationStatus::NotFound);
        ReconciliationStatus::NotFound
    }
}
