//! Almacenamiento persistente de la sesión
//!
//! Guarda `{token, user}` entre ejecuciones. Se lee al arrancar y sólo
//! se escribe en login y logout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::Session;
use crate::utils::errors::ClientResult;

/// Operaciones de almacenamiento de sesión
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> ClientResult<Option<Session>>;
    async fn save(&self, session: &Session) -> ClientResult<()>;
    async fn clear(&self) -> ClientResult<()>;
}

/// Sesión guardada como JSON en disco
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("❌ Sin sesión guardada en {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                debug!("🔑 Sesión cargada para {}", session.user.name);
                Ok(Some(session))
            }
            Err(e) => {
                warn!(
                    "⚠️ Sesión corrupta en {}, se ignora: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let serialized = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, serialized).await?;
        debug!("💾 Sesión guardada en {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("🗑️ Sesión eliminada de {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Sesión sólo en memoria
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}
