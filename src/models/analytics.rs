//! Modelos de Analytics
//!
//! Este módulo contiene los agregados del dashboard de administración.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::booking::Booking;
use super::review::Review;
use super::user::UserProfile;
use super::vehicle::Vehicle;

/// Resumen para dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_bookings: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
}

/// Todas las vistas del panel de administración en una sola carga
#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    pub stats: DashboardStats,
    pub vehicles: Vec<Vehicle>,
    pub bookings: Vec<Booking>,
    pub users: Vec<UserProfile>,
    pub pending_reviews: Vec<Review>,
}
