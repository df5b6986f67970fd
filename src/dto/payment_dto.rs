use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cuerpo de `POST /api/payments/create-session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub vehicle_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Respuesta de creación de sesión de pago
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Cuerpo genérico `{ "message": ... }` de respuestas de error y acciones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// Factura descargada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub payment_id: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Invoice {
    pub fn new(payment_id: &str, bytes: Vec<u8>) -> Self {
        Self {
            payment_id: payment_id.to_string(),
            filename: format!("invoice-{}.pdf", payment_id),
            bytes,
        }
    }
}
