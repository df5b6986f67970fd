//! Services module
//!
//! Este módulo contiene la lógica del cliente: disponibilidad, selección de
//! fechas, intención de reserva, sesión de pago y reconciliación, además de
//! los servicios de autenticación, catálogo, reservas y administración.

pub mod admin_service;
pub mod auth_service;
pub mod availability_service;
pub mod booking_intent_service;
pub mod booking_service;
pub mod catalog_service;
pub mod date_range_selector;
pub mod payment_session_service;
pub mod reconciliation_service;
pub mod scheduled_task;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use availability_service::{is_unavailable, AvailabilityCalculator};
pub use booking_intent_service::{build_intent, estimate_price, intent_from_selector, BookingIntent};
pub use booking_service::{BookingList, BookingService};
pub use catalog_service::CatalogService;
pub use date_range_selector::{DateRangeSelector, SelectionOutcome, SelectionRejection};
pub use payment_session_service::{PaymentSessionInitiator, RedirectTarget, SessionOutcome};
pub use reconciliation_service::{
    session_id_from_redirect, PollerHandle, ReconciliationPoller, ReconciliationStatus,
};
pub use scheduled_task::TaskHandle;
