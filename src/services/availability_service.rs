//! Calculadora de disponibilidad
//!
//! Espejo optimista de las reservas confirmadas de un vehículo. Sirve para
//! deshabilitar días en los selectores; la comprobación autoritativa la
//! hace el backend al crear la sesión de pago.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use crate::client::RentalApi;
use crate::models::BookedRange;
use crate::utils::errors::ClientResult;

/// `true` si `date` cae dentro de algún rango `[start, end]` (inclusivo)
pub fn is_unavailable(date: DateTime<Utc>, booked: &[BookedRange]) -> bool {
    booked.iter().any(|range| range.contains(date))
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityCalculator {
    vehicle_id: String,
    ranges: Vec<BookedRange>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl AvailabilityCalculator {
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            ..Default::default()
        }
    }

    pub fn with_ranges(vehicle_id: impl Into<String>, ranges: Vec<BookedRange>) -> Self {
        let mut calculator = Self::new(vehicle_id);
        calculator.replace_ranges(ranges);
        calculator
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn ranges(&self) -> &[BookedRange] {
        &self.ranges
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn is_unavailable(&self, date: DateTime<Utc>) -> bool {
        is_unavailable(date, &self.ranges)
    }

    /// `true` si ningún rango reservado solapa `[start, end]`
    pub fn is_range_available(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let candidate = BookedRange::new(start, end);
        !self
            .ranges
            .iter()
            .any(|r| r.overlaps(candidate.start_date, candidate.end_date))
    }

    /// Un día del calendario se deshabilita si algún rango lo toca
    pub fn is_day_unavailable(&self, day: NaiveDate) -> bool {
        let Some(start) = day.and_hms_opt(0, 0, 0) else {
            return false;
        };
        let start = start.and_utc();
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        self.ranges.iter().any(|r| r.overlaps(start, end))
    }

    /// Días deshabilitados dentro de `[from, to]`
    pub fn unavailable_days(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        from.iter_days()
            .take_while(|day| *day <= to)
            .filter(|day| self.is_day_unavailable(*day))
            .collect()
    }

    pub fn replace_ranges(&mut self, ranges: Vec<BookedRange>) {
        let mut ranges: Vec<BookedRange> = ranges.into_iter().map(BookedRange::normalized).collect();
        ranges.sort_by_key(|r| r.start_date);
        self.ranges = ranges;
        self.refreshed_at = Some(Utc::now());
    }

    /// Recargar los rangos desde `GET /api/bookings/vehicle/:id/booked-dates`
    pub async fn refresh(&mut self, api: &dyn RentalApi) -> ClientResult<()> {
        let ranges = api.booked_dates(&self.vehicle_id).await?;
        info!(
            "📅 Disponibilidad actualizada para {}: {} rangos reservados",
            self.vehicle_id,
            ranges.len()
        );
        self.replace_ranges(ranges);
        Ok(())
    }
}
