//! Tareas programadas cancelables
//!
//! Una tarea en segundo plano que publica su último estado por un canal
//! `watch`. Detener el handle (o soltarlo) aborta la tarea, de modo que
//! ningún callback posterior modifica estado descartado.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct TaskHandle<S, R = S> {
    status: watch::Receiver<S>,
    task: Option<JoinHandle<R>>,
    name: &'static str,
}

impl<S, R> TaskHandle<S, R>
where
    S: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    pub fn new(name: &'static str, status: watch::Receiver<S>, task: JoinHandle<R>) -> Self {
        Self {
            status,
            task: Some(task),
            name,
        }
    }

    /// Último estado publicado por la tarea
    pub fn status(&self) -> S {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.status.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Cancelar la tarea. No se emiten más peticiones tras esta llamada.
    pub fn stop(mut self) {
        self.abort();
    }

    /// Esperar a que la tarea termine por sí misma
    pub async fn wait(mut self) -> Option<R> {
        let task = self.task.take()?;
        match task.await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("⚠️ Tarea '{}' terminó sin resultado: {}", self.name, e);
                None
            }
        }
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("🛑 Cancelando tarea '{}'", self.name);
            }
            task.abort();
        }
    }
}

impl<S, R> Drop for TaskHandle<S, R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
