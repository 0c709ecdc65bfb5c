use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::permissions::Operation;
use crate::database::leads::{self, LeadChanges, LeadFilter, NewLead};
use crate::database::manager::DatabaseManager;
use crate::database::models::lead::{Lead, LeadStatus, Priority};
use crate::error::ApiError;
use crate::geo;
use crate::middleware::auth::AuthUser;

const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    pub notes: Option<String>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

/// Clamp pagination params to sane bounds; offset 0 / page size 100 defaults.
fn page_window(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 1000);
    (skip, limit)
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<LeadStatus>,
    pub assigned_to: Option<Uuid>,
}

/// POST /leads - register a lead (crm or admin).
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<Json<Lead>, ApiError> {
    auth.require(Operation::LeadCreate)?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation_error("Name is required"));
    }
    if !geo::valid_coordinates(payload.latitude, payload.longitude) {
        return Err(ApiError::validation_error(
            "Latitude must be in [-90, 90] and longitude in [-180, 180]",
        ));
    }

    let pool = DatabaseManager::pool().await?;

    let lead = leads::insert(
        pool,
        NewLead {
            name: payload.name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            address: payload.address,
            latitude: payload.latitude,
            longitude: payload.longitude,
            priority: payload.priority,
            notes: payload.notes,
            created_by: auth.id,
        },
    )
    .await?;

    tracing::info!(lead_id = %lead.id, "lead created");

    Ok(Json(lead))
}

/// GET /leads - paginated list in creation order with equality filters.
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListLeadsQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    auth.require(Operation::LeadList)?;

    let (skip, limit) = page_window(params.skip, params.limit);

    let pool = DatabaseManager::pool().await?;

    let leads = leads::list(
        pool,
        LeadFilter {
            skip,
            limit,
            status: params.status,
            assigned_to: params.assigned_to,
        },
    )
    .await?;

    Ok(Json(leads))
}

/// PUT /leads/:id - partial update of status/priority/contact fields.
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, ApiError> {
    auth.require(Operation::LeadUpdate)?;

    let pool = DatabaseManager::pool().await?;

    let lead = leads::update(
        pool,
        id,
        LeadChanges {
            name: payload.name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            address: payload.address,
            status: payload.status,
            priority: payload.priority,
            notes: payload.notes,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    Ok(Json(lead))
}

/// DELETE /leads/:id - remove a lead (admin only).
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Operation::LeadDelete)?;

    let pool = DatabaseManager::pool().await?;

    if !leads::delete(pool, id).await? {
        return Err(ApiError::not_found("Lead not found"));
    }

    tracing::info!(lead_id = %id, deleted_by = %auth.id, "lead deleted");

    Ok(Json(json!({ "message": "Lead deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(page_window(None, None), (0, 100));
    }

    #[test]
    fn pagination_clamps_bounds() {
        assert_eq!(page_window(Some(-5), Some(0)), (0, 1));
        assert_eq!(page_window(Some(2), Some(2)), (2, 2));
        assert_eq!(page_window(Some(0), Some(10_000)), (0, 1000));
    }
}
