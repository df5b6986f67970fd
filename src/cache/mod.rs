//! Cache
//!
//! Este módulo contiene el almacenamiento local de la sesión.

pub mod session_store;

pub use session_store::{FileSessionStore, MemorySessionStore, SessionStorage};
