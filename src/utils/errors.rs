//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente
//! y su conversión a avisos visibles para el usuario.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Mensaje por defecto cuando el backend rechaza un rango ya reservado
pub const ALREADY_BOOKED_MESSAGE: &str = "This vehicle is already booked for the selected dates.";

/// Errores principales del cliente
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    TransientNetwork(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Nivel de un aviso mostrado al usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Aviso visible para el usuario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl ClientError {
    /// Clasificar una respuesta HTTP no exitosa
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthenticated(
                message.unwrap_or_else(|| "Session expired or invalid".to_string()),
            ),
            StatusCode::FORBIDDEN => ClientError::Forbidden(
                message.unwrap_or_else(|| "Access denied".to_string()),
            ),
            StatusCode::NOT_FOUND => ClientError::NotFound(
                message.unwrap_or_else(|| "Resource not found".to_string()),
            ),
            StatusCode::CONFLICT => ClientError::Conflict(
                message.unwrap_or_else(|| ALREADY_BOOKED_MESSAGE.to_string()),
            ),
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
                ClientError::TransientNetwork(format!(
                    "{}: {}",
                    status,
                    message.unwrap_or_default()
                ))
            }
            s if s.is_server_error() => ClientError::TransientNetwork(format!(
                "{}: {}",
                s,
                message.unwrap_or_default()
            )),
            s => ClientError::Api {
                status: s.as_u16(),
                message: message.unwrap_or_else(|| s.to_string()),
            },
        }
    }

    /// Indica si reintentar la misma operación puede tener éxito
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::TransientNetwork(_))
    }

    /// Aviso visible asociado al error
    pub fn notice(&self) -> Notice {
        match self {
            ClientError::MissingInput(msg) => Notice::warning("Missing Input", msg.clone()),
            ClientError::Validation(_) => {
                Notice::warning("Invalid Input", "Please check the highlighted fields.")
            }
            ClientError::Unauthenticated(_) => {
                Notice::warning("Login Required", "Please log in to continue.")
            }
            ClientError::Forbidden(_) => {
                Notice::error("Unauthorized", "Administrator access is required.")
            }
            ClientError::Conflict(msg) => Notice::warning("Already Booked", msg.clone()),
            ClientError::NotFound(msg) => Notice::error("Not Found", msg.clone()),
            ClientError::TransientNetwork(_) => Notice::error(
                "Request Failed",
                "Unable to reach the server. Please try again.",
            ),
            ClientError::Api { message, .. } => Notice::error("Request Failed", message.clone()),
            ClientError::Decode(_) => Notice::error(
                "Request Failed",
                "The server returned an unexpected response. Please try again.",
            ),
            ClientError::Storage(msg) => Notice::error("Storage Error", msg.clone()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ClientError::from_status(status, None)
        } else {
            ClientError::TransientNetwork(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type ClientResult<T> = Result<T, ClientError>;

/// Error de fechas sin seleccionar
pub fn missing_dates() -> ClientError {
    ClientError::MissingInput("Please select both start and end dates.".to_string())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> ClientError {
    ClientError::NotFound(format!("{} with id '{}' not found", resource, id))
}
