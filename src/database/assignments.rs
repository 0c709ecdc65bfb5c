//! SQL access for lead-to-salesperson assignments.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::assignment::{Assignment, AssignmentStatus};

#[derive(Default)]
pub struct AssignmentFilter {
    pub salesperson_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn insert<'e>(
    db: impl PgExecutor<'e>,
    lead_id: Uuid,
    salesperson_id: Uuid,
    assigned_by: Uuid,
    notes: Option<String>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        r#"
        INSERT INTO assignments (id, lead_id, salesperson_id, assigned_by, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(lead_id)
    .bind(salesperson_id)
    .bind(assigned_by)
    .bind(notes)
    .fetch_one(db)
    .await
}

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// The lead's current non-completed assignment, if one exists.
pub async fn active_for_lead<'e>(
    db: impl PgExecutor<'e>,
    lead_id: Uuid,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        "SELECT * FROM assignments WHERE lead_id = $1 AND completed_at IS NULL",
    )
    .bind(lead_id)
    .fetch_optional(db)
    .await
}

pub async fn list(pool: &PgPool, filter: AssignmentFilter) -> Result<Vec<Assignment>, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM assignments WHERE true");

    if let Some(salesperson_id) = filter.salesperson_id {
        query.push(" AND salesperson_id = ");
        query.push_bind(salesperson_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
    if let Some(from) = filter.from {
        query.push(" AND assigned_at >= ");
        query.push_bind(from);
    }
    if let Some(to) = filter.to {
        query.push(" AND assigned_at <= ");
        query.push_bind(to);
    }

    query.push(" ORDER BY assigned_at DESC");
    query.build_query_as::<Assignment>().fetch_all(pool).await
}

/// Apply a status transition. Sets `completed_at` on the terminal
/// transition; legality of the transition is checked by the caller.
pub async fn update_status<'e>(
    db: impl PgExecutor<'e>,
    id: Uuid,
    status: AssignmentStatus,
    notes: Option<String>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        r#"
        UPDATE assignments
        SET status = $2,
            notes = COALESCE($3, notes),
            completed_at = CASE WHEN $2 = 'completed'::assignment_status THEN now() ELSE completed_at END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(notes)
    .fetch_one(db)
    .await
}
