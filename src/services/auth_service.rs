use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use crate::cache::SessionStorage;
use crate::client::RentalApi;
use crate::dto::{LoginRequest, RegisterRequest};
use crate::models::Session;
use crate::utils::errors::{ClientError, ClientResult, Notice};

/// Servicio de autenticación
///
/// Único escritor del almacenamiento de sesión: login lo crea y logout lo
/// destruye. El resto de servicios recibe la `Session` explícitamente.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn RentalApi>,
    store: Arc<dyn SessionStorage>,
}

impl AuthService {
    pub fn new(api: Arc<dyn RentalApi>, store: Arc<dyn SessionStorage>) -> Self {
        Self { api, store }
    }

    /// Autentica un usuario y persiste la sesión
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::MissingInput(
                "Please enter both email and password.".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.login(&request).await.map_err(|e| {
            error!("❌ Login fallido para {}: {}", request.email, e);
            e
        })?;

        let (Some(token), Some(user)) = (response.token, response.user) else {
            error!("❌ Respuesta de login sin token o usuario");
            return Err(ClientError::Decode("Invalid response from server".to_string()));
        };

        let session = Session::new(token, user);
        self.store.save(&session).await?;
        info!("✅ Sesión iniciada para {}", session.user.name);
        Ok(session)
    }

    /// Registra un usuario nuevo. No inicia sesión.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<Notice> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let response = self.api.register(&request).await.map_err(|e| {
            error!("❌ Registro fallido para {}: {}", request.email, e);
            e
        })?;

        info!("✅ Usuario registrado: {}", request.email);
        Ok(Notice::success(
            "Registration Successful",
            response
                .message
                .unwrap_or_else(|| "Registration successful! Please log in.".to_string()),
        ))
    }

    /// Sesión guardada, descartando las que ya no son válidas
    pub async fn current_session(&self) -> ClientResult<Option<Session>> {
        match self.store.load().await? {
            Some(session) if session.is_valid() => Ok(Some(session)),
            Some(_) => {
                warn!("⏰ Sesión guardada expirada, se elimina");
                self.store.clear().await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub async fn require_session(&self) -> ClientResult<Session> {
        self.current_session()
            .await?
            .ok_or_else(|| ClientError::Unauthenticated("Please log in to continue.".to_string()))
    }

    /// Refrescar el perfil con `GET /api/users/me`
    pub async fn refresh_profile(&self, session: &Session) -> ClientResult<Session> {
        match self.api.current_user(session.token()).await {
            Ok(user) => {
                let refreshed = Session::new(session.token(), user);
                self.store.save(&refreshed).await?;
                Ok(refreshed)
            }
            Err(ClientError::Unauthenticated(msg)) => {
                warn!("⏰ Token rechazado por el backend: {}", msg);
                self.store.clear().await?;
                Err(ClientError::Unauthenticated(msg))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.store.clear().await?;
        info!("👋 Sesión cerrada");
        Ok(())
    }
}
