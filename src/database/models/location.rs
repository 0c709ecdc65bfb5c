use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
pub enum Availability {
    Available,
    Busy,
}

/// Latest reported coordinate and availability for a salesperson.
/// One row per user; each report overwrites the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalespersonLocation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub availability: Availability,
    pub updated_at: DateTime<Utc>,
}
