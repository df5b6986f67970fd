//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! a las respuestas JSON del backend de reservas.

pub mod analytics;
pub mod booking;
pub mod payment;
pub mod review;
pub mod user;
pub mod vehicle;

pub use analytics::{AdminOverview, DashboardStats};
pub use booking::{BookedRange, Booking, BookingStatus};
pub use payment::{Payment, PaymentRef};
pub use review::Review;
pub use user::{Session, UserProfile, UserRef};
pub use vehicle::{Vehicle, VehicleRef, VehicleSummary};
