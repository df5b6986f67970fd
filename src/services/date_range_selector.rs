//! Selector de rango de fechas
//!
//! Dos selectores (inicio/fin) restringidos por la disponibilidad y entre
//! sí. `is_ready` es derivado: nunca se guarda.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::availability_service::AvailabilityCalculator;

/// Motivo por el que un selector rechaza una fecha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SelectionRejection {
    /// La fecha cae dentro de una reserva existente
    Unavailable,
    /// La fecha es anterior al mínimo del selector
    BeforeMinimum { minimum: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Accepted,
    Rejected(SelectionRejection),
}

impl SelectionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SelectionOutcome::Accepted)
    }
}

/// Un día marcado en el calendario no se puede elegir a ninguna hora
fn is_blocked(date: DateTime<Utc>, availability: &AvailabilityCalculator) -> bool {
    availability.is_day_unavailable(date.date_naive()) || availability.is_unavailable(date)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeSelector {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateRangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Mínimo del selector de fin: `max(start, now)`
    pub fn min_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.start.map_or(now, |start| start.max(now))
    }

    /// Cambiar el inicio no borra un fin ya elegido
    pub fn select_start(
        &mut self,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
        availability: &AvailabilityCalculator,
    ) -> SelectionOutcome {
        if date < now {
            return SelectionOutcome::Rejected(SelectionRejection::BeforeMinimum { minimum: now });
        }
        if is_blocked(date, availability) {
            return SelectionOutcome::Rejected(SelectionRejection::Unavailable);
        }
        self.start = Some(date);
        SelectionOutcome::Accepted
    }

    pub fn select_end(
        &mut self,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
        availability: &AvailabilityCalculator,
    ) -> SelectionOutcome {
        let minimum = self.min_end(now);
        if date < minimum {
            return SelectionOutcome::Rejected(SelectionRejection::BeforeMinimum { minimum });
        }
        if is_blocked(date, availability) {
            return SelectionOutcome::Rejected(SelectionRejection::Unavailable);
        }
        self.end = Some(date);
        SelectionOutcome::Accepted
    }

    /// Ambos extremos presentes y `end >= max(start, now)`
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end >= start && end >= self.min_end(now),
            _ => false,
        }
    }

    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start.zip(self.end)
    }

    /// El rango elegido solapa una reserva conocida (sólo orientativo)
    pub fn has_known_conflict(&self, availability: &AvailabilityCalculator) -> bool {
        self.range()
            .map_or(false, |(start, end)| !availability.is_range_available(start, end))
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }
}
