//! Modelo de usuario y sesión
//!
//! La sesión se crea en el login, se destruye en el logout y se pasa
//! explícitamente a cada servicio que la necesita.

use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Perfil mínimo del usuario autenticado
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Referencia a un usuario: poblado o sólo el identificador
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserProfile),
    Id(String),
}

impl UserRef {
    pub fn name(&self) -> &str {
        match self {
            UserRef::Populated(u) => &u.name,
            UserRef::Id(_) => "N/A",
        }
    }
}

/// Sesión de autenticación: token bearer + perfil
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Capacidad de autenticación: token presente y no expirado
    pub fn is_valid(&self) -> bool {
        jwt::is_token_usable(&self.token)
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}

// El token no debe aparecer en los logs
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
