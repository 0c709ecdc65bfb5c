use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    /// Legal lifecycle: pending -> in_progress -> completed, with
    /// pending -> completed as a shortcut. Completed is terminal.
    pub fn can_transition_to(&self, next: AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed)
    }
}

/// The binding of a Lead to a salesperson for follow-up.
/// Never deleted once completed; rows are the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub salesperson_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
