//! Modelo de Booking
//!
//! Reservas y rangos reservados tal como los expone el backend.
//! El cliente nunca crea reservas: sólo las lee y las cancela.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payment::PaymentRef;
use super::user::UserRef;
use super::vehicle::VehicleRef;

/// Rango `[start, end]` de una reserva confirmada existente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl BookedRange {
    /// Crea un rango ordenado aunque los extremos lleguen invertidos
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_date: start.min(end),
            end_date: start.max(end),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.start_date, self.end_date)
    }

    /// Ambos extremos inclusivos
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start_date <= instant && instant <= self.end_date
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

/// Estado del ciclo de vida de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// Reserva de un vehículo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub vehicle: Option<VehicleRef>,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default)]
    pub payment: Option<PaymentRef>,
    #[serde(default, alias = "stripeSessionId")]
    pub session_id: Option<String>,
}

impl Booking {
    /// Identificador de la sesión de pago que originó la reserva
    pub fn payment_session_id(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .or_else(|| self.payment.as_ref().and_then(|p| p.session_id()))
    }

    /// El control de cancelación se deshabilita una vez cancelada
    pub fn can_cancel(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    pub fn range(&self) -> BookedRange {
        BookedRange::new(self.start_date, self.end_date)
    }

    /// Importe (unidades mayores) y estado del pago, si viene poblado
    pub fn payment_label(&self) -> Option<String> {
        let payment = self.payment.as_ref()?.details()?;
        Some(format!(
            "₹{:.2} {}",
            payment.amount_major(),
            payment.status.as_deref().unwrap_or("unknown")
        ))
    }

    pub fn vehicle_label(&self) -> String {
        match &self.vehicle {
            Some(VehicleRef::Populated(v)) => match v.year {
                Some(year) => format!("{} {} ({})", v.make, v.model, year),
                None => format!("{} {}", v.make, v.model),
            },
            Some(VehicleRef::Id(id)) => id.clone(),
            None => "Unknown vehicle".to_string(),
        }
    }
}
