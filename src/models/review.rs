//! Modelo de Review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserRef;
use super::vehicle::VehicleRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub vehicle: Option<VehicleRef>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
