//! Cliente de la tienda de alquiler de vehículos
//!
//! Catálogo, disponibilidad, reserva con pago externo y reconciliación de la
//! reserva creada por el webhook del backend.

pub mod cache;
pub mod client;
pub mod config;
pub mod dto;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use client::{HttpRentalApi, RentalApi};
pub use config::ClientConfig;
pub use state::AppState;
pub use utils::errors::{ClientError, ClientResult, Notice, NoticeLevel};
