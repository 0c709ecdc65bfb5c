use axum::{Extension, Json};

use crate::auth::permissions::Operation;
use crate::database::manager::DatabaseManager;
use crate::database::reports::{self, DashboardReport};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// GET /reports/dashboard - lead/assignment counts, per-salesperson
/// performance and conversion ratio, computed fresh from the live store.
pub async fn dashboard(
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardReport>, ApiError> {
    auth.require(Operation::ReportView)?;

    let pool = DatabaseManager::pool().await?;
    let report = reports::dashboard(pool).await?;

    Ok(Json(report))
}
