//! Iniciador de sesiones de pago
//!
//! Intercambia una intención validada por una URL del proveedor de pago.
//! La única frontera de corrección es la respuesta del backend: un 409
//! significa que otra reserva ganó la carrera por esas fechas.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::availability_service::AvailabilityCalculator;
use super::booking_intent_service::BookingIntent;
use crate::client::RentalApi;
use crate::models::Session;
use crate::utils::errors::{ClientError, Notice};

/// Destino de la redirección al checkout externo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectTarget {
    pub url: String,
    pub session_id: Option<String>,
}

/// Resultado de `initiate`, con tres ramas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Paso terminal: el navegador abandona la aplicación
    Redirect(RedirectTarget),
    /// Solapamiento autoritativo; la disponibilidad ya fue recargada
    Conflict { message: String },
    /// Cualquier otro fallo; la intención se conserva para reintentar
    Failed { notice: Notice, retryable: bool },
}

impl SessionOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            SessionOutcome::Redirect(_) => {
                Notice::info("Redirecting", "Redirecting to secure checkout...")
            }
            SessionOutcome::Conflict { message } => Notice::warning("Already Booked", message.clone()),
            SessionOutcome::Failed { notice, .. } => notice.clone(),
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            SessionOutcome::Redirect(target) => Some(&target.url),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct PaymentSessionInitiator {
    api: Arc<dyn RentalApi>,
}

impl PaymentSessionInitiator {
    pub fn new(api: Arc<dyn RentalApi>) -> Self {
        Self { api }
    }

    /// Crear la sesión de pago. Reinvocar con la misma intención es
    /// seguro: el backend deduplica con la misma comprobación de solape.
    pub async fn initiate(
        &self,
        intent: &BookingIntent,
        session: &Session,
        availability: &mut AvailabilityCalculator,
    ) -> SessionOutcome {
        info!(
            "💳 Creando sesión de pago para intención {} (vehículo {})",
            intent.id, intent.vehicle_id
        );

        match self
            .api
            .create_payment_session(session.token(), &intent.to_request())
            .await
        {
            Ok(response) => match response.url.filter(|url| !url.trim().is_empty()) {
                Some(url) => {
                    info!("✅ Sesión de pago creada para intención {}", intent.id);
                    SessionOutcome::Redirect(RedirectTarget {
                        url,
                        session_id: response.session_id,
                    })
                }
                None => {
                    let detail = response
                        .message
                        .unwrap_or_else(|| "Failed to create payment session".to_string());
                    error!("❌ Respuesta sin URL de checkout: {}", detail);
                    failed(ClientError::Decode(detail))
                }
            },
            Err(ClientError::Conflict(message)) => {
                warn!(
                    "⚠️ Conflicto para intención {}: {}",
                    intent.id, message
                );
                if let Err(e) = availability.refresh(self.api.as_ref()).await {
                    warn!(
                        "⚠️ No se pudo recargar la disponibilidad de {}: {}",
                        availability.vehicle_id(),
                        e
                    );
                }
                SessionOutcome::Conflict { message }
            }
            Err(e) => {
                error!("❌ Error creando sesión de pago para {}: {}", intent.id, e);
                failed(e)
            }
        }
    }
}

fn failed(error: ClientError) -> SessionOutcome {
    let notice = match &error {
        ClientError::TransientNetwork(_) | ClientError::Decode(_) => Notice::error(
            "Payment Failed",
            "Unable to process payment. Please try again.",
        ),
        other => other.notice(),
    };
    SessionOutcome::Failed {
        notice,
        retryable: error.is_retryable(),
    }
}
