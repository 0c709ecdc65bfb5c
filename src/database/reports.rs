//! Read-only aggregation queries for the dashboard. Computed fresh per
//! request from the live store; no caching.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::models::assignment::AssignmentStatus;
use crate::database::models::lead::LeadStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalespersonPerformance {
    pub id: Uuid,
    pub name: String,
    pub completed: i64,
    pub in_progress: i64,
    pub pending: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub leads_by_status: BTreeMap<String, i64>,
    pub assignments_by_status: BTreeMap<String, i64>,
    pub salesperson_performance: Vec<SalespersonPerformance>,
    pub total_leads: i64,
    pub closed_leads: i64,
    pub conversion_rate: f64,
}

pub async fn dashboard(pool: &PgPool) -> Result<DashboardReport, sqlx::Error> {
    let lead_counts: Vec<(LeadStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM leads GROUP BY status")
            .fetch_all(pool)
            .await?;

    let assignment_counts: Vec<(AssignmentStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM assignments GROUP BY status")
            .fetch_all(pool)
            .await?;

    let salesperson_performance = sqlx::query_as::<_, SalespersonPerformance>(
        r#"
        SELECT u.id, u.name,
               COUNT(a.id) FILTER (WHERE a.status = 'completed') AS completed,
               COUNT(a.id) FILTER (WHERE a.status = 'in_progress') AS in_progress,
               COUNT(a.id) FILTER (WHERE a.status = 'pending') AS pending
        FROM users u
        LEFT JOIN assignments a ON a.salesperson_id = u.id
        WHERE u.role = 'salesperson'
        GROUP BY u.id, u.name
        ORDER BY u.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let total_leads: i64 = lead_counts.iter().map(|(_, n)| n).sum();
    let closed_leads = lead_counts
        .iter()
        .find(|(status, _)| *status == LeadStatus::Closed)
        .map(|(_, n)| *n)
        .unwrap_or(0);

    let conversion_rate = if total_leads > 0 {
        closed_leads as f64 / total_leads as f64
    } else {
        0.0
    };

    Ok(DashboardReport {
        leads_by_status: status_map(&lead_counts),
        assignments_by_status: status_map(&assignment_counts),
        salesperson_performance,
        total_leads,
        closed_leads,
        conversion_rate,
    })
}

fn status_map<S: Serialize>(counts: &[(S, i64)]) -> BTreeMap<String, i64> {
    counts
        .iter()
        .map(|(status, n)| {
            // Enum serde representation is a plain string, e.g. "in_progress"
            let key = serde_json::to_value(status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            (key, *n)
        })
        .collect()
}
