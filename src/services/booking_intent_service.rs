//! Constructor de intenciones de reserva
//!
//! Valida un triple (vehículo, inicio, fin) y deriva el precio estimado.
//! No hace ninguna llamada de red.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::date_range_selector::DateRangeSelector;
use crate::dto::CreateSessionRequest;
use crate::models::{Session, Vehicle};
use crate::utils::errors::{missing_dates, ClientError, ClientResult};
use crate::utils::validation::require_id;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Intención de reserva efímera, local al cliente
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingIntent {
    /// Sólo para correlacionar logs
    pub id: Uuid,
    pub vehicle_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub billable_days: i64,
    pub price_estimate: Decimal,
}

impl BookingIntent {
    pub fn to_request(&self) -> CreateSessionRequest {
        CreateSessionRequest {
            vehicle_id: self.vehicle_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Días facturables: cualquier fracción de día cuenta como día completo
pub fn billable_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let span_ms = (end - start).num_milliseconds();
    if span_ms <= 0 {
        return 0;
    }
    (span_ms + DAY_MS - 1) / DAY_MS
}

pub fn estimate_price(start: DateTime<Utc>, end: DateTime<Utc>, price_per_day: Decimal) -> Decimal {
    Decimal::from(billable_days(start, end)) * price_per_day
}

/// Validar y construir una intención de reserva.
///
/// Orden: fechas presentes, fin no anterior al inicio, sesión válida.
pub fn build_intent(
    vehicle_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    price_per_day: Decimal,
    session: Option<&Session>,
) -> ClientResult<BookingIntent> {
    let (Some(start_date), Some(end_date)) = (start, end) else {
        return Err(missing_dates());
    };
    if end_date < start_date {
        return Err(ClientError::MissingInput(
            "The end date must not be before the start date.".to_string(),
        ));
    }
    if !session.map_or(false, Session::is_valid) {
        return Err(ClientError::Unauthenticated(
            "Please log in to book a vehicle.".to_string(),
        ));
    }
    require_id("vehicle", vehicle_id)?;

    let intent = BookingIntent {
        id: Uuid::new_v4(),
        vehicle_id: vehicle_id.to_string(),
        start_date,
        end_date,
        billable_days: billable_days(start_date, end_date),
        price_estimate: estimate_price(start_date, end_date, price_per_day),
    };
    debug!(
        "🧾 Intención {} para {}: {} días, total {}",
        intent.id, intent.vehicle_id, intent.billable_days, intent.price_estimate
    );
    Ok(intent)
}

/// Construir la intención a partir del selector de un vehículo
pub fn intent_from_selector(
    vehicle: &Vehicle,
    selector: &DateRangeSelector,
    session: Option<&Session>,
) -> ClientResult<BookingIntent> {
    build_intent(
        &vehicle.id,
        selector.start(),
        selector.end(),
        vehicle.price_per_day,
        session,
    )
}
