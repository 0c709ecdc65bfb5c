use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::permissions::Operation;
use crate::database::assignments::{self, AssignmentFilter};
use crate::database::locations;
use crate::database::manager::DatabaseManager;
use crate::database::models::assignment::{Assignment, AssignmentStatus};
use crate::database::models::location::Availability;
use crate::database::models::user::Role;
use crate::database::{leads, users};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub lead_id: Uuid,
    pub salesperson_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAssignmentsQuery {
    pub salesperson_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub status: AssignmentStatus,
    pub notes: Option<String>,
}

/// POST /assign - bind a lead to a salesperson (crm or admin).
///
/// Refuses a second active assignment for a lead: checked here, and backed
/// by a partial unique index so a concurrent double-assign surfaces as a
/// conflict instead of a silent duplicate.
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<Assignment>, ApiError> {
    auth.require(Operation::AssignmentCreate)?;

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    leads::find_by_id(&mut *tx, payload.lead_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Lead not found"))?;

    let salesperson = users::find_salesperson(&mut *tx, payload.salesperson_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Salesperson not found"))?;

    if assignments::active_for_lead(&mut *tx, payload.lead_id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(
            "Lead already has an active assignment",
        ));
    }

    let assignment = assignments::insert(
        &mut *tx,
        payload.lead_id,
        salesperson.id,
        auth.id,
        payload.notes,
    )
    .await?;

    // No-op when the salesperson has not reported a location yet
    locations::set_availability(&mut *tx, salesperson.id, Availability::Busy).await?;

    tx.commit().await?;

    tracing::info!(
        assignment_id = %assignment.id,
        lead_id = %assignment.lead_id,
        salesperson_id = %assignment.salesperson_id,
        "lead assigned"
    );

    Ok(Json(assignment))
}

/// GET /assignments - filtered list; salespersons only ever see their own.
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListAssignmentsQuery>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    auth.require(Operation::AssignmentList)?;

    let salesperson_id = if auth.role == Role::Salesperson {
        Some(auth.id)
    } else {
        params.salesperson_id
    };

    let pool = DatabaseManager::pool().await?;

    let assignments = assignments::list(
        pool,
        AssignmentFilter {
            salesperson_id,
            status: params.status,
            from: params.from,
            to: params.to,
        },
    )
    .await?;

    Ok(Json(assignments))
}

/// PUT /assignments/:id - progress the assignment state machine.
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, ApiError> {
    auth.require(Operation::AssignmentUpdate)?;

    let pool = DatabaseManager::pool().await?;
    let mut tx = pool.begin().await?;

    let assignment = assignments::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment not found"))?;

    // A salesperson may only progress assignments bound to them
    if auth.role == Role::Salesperson && assignment.salesperson_id != auth.id {
        return Err(ApiError::forbidden("Not enough permissions"));
    }

    if !assignment.status.can_transition_to(payload.status) {
        return Err(ApiError::conflict(format!(
            "Invalid status transition: {:?} -> {:?}",
            assignment.status, payload.status
        )));
    }

    let updated = assignments::update_status(&mut *tx, id, payload.status, payload.notes).await?;

    if updated.status.is_terminal() {
        locations::set_availability(&mut *tx, updated.salesperson_id, Availability::Available)
            .await?;
    }

    tx.commit().await?;

    Ok(Json(updated))
}
