//! SQL access for salesperson location tracking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgExecutor, FromRow};
use uuid::Uuid;

use crate::database::models::location::{Availability, SalespersonLocation};

/// A salesperson joined with their most recent location report, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalespersonRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub availability: Option<Availability>,
    pub location_updated_at: Option<DateTime<Utc>>,
}

/// Record the calling salesperson's latest position. Upsert semantics:
/// one row per user, each report replaces the previous one. A missing
/// availability keeps the stored value (or `available` on first report).
pub async fn upsert<'e>(
    db: impl PgExecutor<'e>,
    user_id: Uuid,
    latitude: f64,
    longitude: f64,
    availability: Option<Availability>,
) -> Result<SalespersonLocation, sqlx::Error> {
    sqlx::query_as::<_, SalespersonLocation>(
        r#"
        INSERT INTO salesperson_locations (id, user_id, latitude, longitude, availability, updated_at)
        VALUES ($1, $2, $3, $4, COALESCE($5, 'available'::availability_status), now())
        ON CONFLICT (user_id) DO UPDATE
        SET latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            availability = COALESCE($5, salesperson_locations.availability),
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(availability)
    .fetch_one(db)
    .await
}

pub async fn set_availability<'e>(
    db: impl PgExecutor<'e>,
    user_id: Uuid,
    availability: Availability,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE salesperson_locations SET availability = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(availability)
        .execute(db)
        .await?;
    Ok(())
}

/// All active salespersons with their current status, located or not.
pub async fn list_salespersons<'e>(
    db: impl PgExecutor<'e>,
) -> Result<Vec<SalespersonRow>, sqlx::Error> {
    sqlx::query_as::<_, SalespersonRow>(
        r#"
        SELECT u.id, u.name, u.email, u.phone,
               l.latitude, l.longitude, l.availability, l.updated_at AS location_updated_at
        FROM users u
        LEFT JOIN salesperson_locations l ON l.user_id = u.id
        WHERE u.role = 'salesperson' AND u.is_active
        ORDER BY u.name ASC
        "#,
    )
    .fetch_all(db)
    .await
}

/// Salespersons that have reported a location; input for the nearest-first
/// scan-and-sort.
pub async fn located_salespersons<'e>(
    db: impl PgExecutor<'e>,
) -> Result<Vec<SalespersonRow>, sqlx::Error> {
    sqlx::query_as::<_, SalespersonRow>(
        r#"
        SELECT u.id, u.name, u.email, u.phone,
               l.latitude, l.longitude, l.availability, l.updated_at AS location_updated_at
        FROM users u
        JOIN salesperson_locations l ON l.user_id = u.id
        WHERE u.role = 'salesperson' AND u.is_active
        "#,
    )
    .fetch_all(db)
    .await
}
