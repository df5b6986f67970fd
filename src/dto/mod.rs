pub mod auth_dto;
pub mod payment_dto;
pub mod review_dto;
pub mod vehicle_dto;

pub use auth_dto::*;
pub use payment_dto::*;
pub use review_dto::*;
pub use vehicle_dto::*;
