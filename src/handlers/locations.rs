use axum::{extract::Query, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::permissions::Operation;
use crate::database::locations::{self, SalespersonRow};
use crate::database::manager::DatabaseManager;
use crate::database::models::location::{Availability, SalespersonLocation};
use crate::error::ApiError;
use crate::geo;
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LocationReportRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub availability: Option<Availability>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct SalespersonWithDistance {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub availability: Option<Availability>,
    pub location_updated_at: Option<DateTime<Utc>>,
    pub distance_km: f64,
}

/// POST /salesperson/location - upsert the caller's current position.
pub async fn report(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<LocationReportRequest>,
) -> Result<Json<SalespersonLocation>, ApiError> {
    auth.require(Operation::LocationReport)?;

    if !geo::valid_coordinates(payload.latitude, payload.longitude) {
        return Err(ApiError::validation_error(
            "Latitude must be in [-90, 90] and longitude in [-180, 180]",
        ));
    }

    let pool = DatabaseManager::pool().await?;

    let location = locations::upsert(
        pool,
        auth.id,
        payload.latitude,
        payload.longitude,
        payload.availability,
    )
    .await?;

    Ok(Json(location))
}

/// GET /salespersons - all active salespersons with current status.
pub async fn list(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<SalespersonRow>>, ApiError> {
    auth.require(Operation::SalespersonList)?;

    let pool = DatabaseManager::pool().await?;
    let salespersons = locations::list_salespersons(pool).await?;

    Ok(Json(salespersons))
}

/// GET /salespersons/nearby?lat=&lng= - located salespersons ordered by
/// ascending great-circle distance from the reference point.
pub async fn nearby(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<Vec<SalespersonWithDistance>>, ApiError> {
    auth.require(Operation::SalespersonNearby)?;

    if !geo::valid_coordinates(params.lat, params.lng) {
        return Err(ApiError::validation_error(
            "lat must be in [-90, 90] and lng in [-180, 180]",
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let located = locations::located_salespersons(pool).await?;

    let sorted = geo::sort_by_distance(located, params.lat, params.lng, |row| {
        // located_salespersons inner-joins on the location table
        (row.latitude.unwrap_or_default(), row.longitude.unwrap_or_default())
    });

    let result = sorted
        .into_iter()
        .map(|(row, distance)| SalespersonWithDistance {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            latitude: row.latitude.unwrap_or_default(),
            longitude: row.longitude.unwrap_or_default(),
            availability: row.availability,
            location_updated_at: row.location_updated_at,
            distance_km: (distance * 100.0).round() / 100.0,
        })
        .collect();

    Ok(Json(result))
}
