//! SQL access for lead records.

use sqlx::{postgres::PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::lead::{Lead, LeadStatus, Priority};

pub struct NewLead {
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: Priority,
    pub notes: Option<String>,
    pub created_by: Uuid,
}

#[derive(Default)]
pub struct LeadChanges {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

pub struct LeadFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<LeadStatus>,
    /// Salesperson with an active assignment on the lead
    pub assigned_to: Option<Uuid>,
}

pub async fn insert<'e>(db: impl PgExecutor<'e>, lead: NewLead) -> Result<Lead, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        r#"
        INSERT INTO leads
            (id, name, contact_email, contact_phone, address, latitude, longitude, priority, notes, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(lead.name)
    .bind(lead.contact_email)
    .bind(lead.contact_phone)
    .bind(lead.address)
    .bind(lead.latitude)
    .bind(lead.longitude)
    .bind(lead.priority)
    .bind(lead.notes)
    .bind(lead.created_by)
    .fetch_one(db)
    .await
}

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Paginated list in creation order, with optional equality filters.
pub async fn list(pool: &PgPool, filter: LeadFilter) -> Result<Vec<Lead>, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT l.* FROM leads l");

    if let Some(salesperson_id) = filter.assigned_to {
        query.push(" JOIN assignments a ON a.lead_id = l.id AND a.completed_at IS NULL AND a.salesperson_id = ");
        query.push_bind(salesperson_id);
    }

    if let Some(status) = filter.status {
        query.push(" WHERE l.status = ");
        query.push_bind(status);
    }

    // id as tiebreak keeps pagination windows stable for equal timestamps
    query.push(" ORDER BY l.created_at ASC, l.id ASC LIMIT ");
    query.push_bind(filter.limit);
    query.push(" OFFSET ");
    query.push_bind(filter.skip);

    query.build_query_as::<Lead>().fetch_all(pool).await
}

/// Partial update; bumps `updated_at` on any change.
pub async fn update<'e>(
    db: impl PgExecutor<'e>,
    id: Uuid,
    changes: LeadChanges,
) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        r#"
        UPDATE leads
        SET name = COALESCE($2, name),
            contact_email = COALESCE($3, contact_email),
            contact_phone = COALESCE($4, contact_phone),
            address = COALESCE($5, address),
            status = COALESCE($6, status),
            priority = COALESCE($7, priority),
            notes = COALESCE($8, notes),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.contact_email)
    .bind(changes.contact_phone)
    .bind(changes.address)
    .bind(changes.status)
    .bind(changes.priority)
    .bind(changes.notes)
    .fetch_optional(db)
    .await
}

pub async fn delete<'e>(db: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leads WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
