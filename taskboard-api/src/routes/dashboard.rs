/// Dashboard summary
///
/// ```text
/// GET /dashboard
/// ```
///
/// ```json
/// {
///   "name": "Ada",
///   "stats": { "total": 4, "completed": 1, "pending": 2, "inProgress": 1, "completionRate": 25 },
///   "recentTasks": [ ... ]
/// }
/// ```

use axum::{extract::State, Json};
use serde::Serialize;
use taskboard_shared::{models::task::Task, services::TaskStats};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    session::AuthUser,
};

/// Tasks shown under "recent"
pub const RECENT_TASKS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub name: String,
    pub stats: TaskStats,
    pub recent_tasks: Vec<Task>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<DashboardResponse>> {
    let (account, stats, recent_tasks) = tokio::try_join!(
        async { state.accounts.profile(&identity).await.map_err(ApiError::from) },
        async { state.tasks.stats(&identity).await.map_err(ApiError::from) },
        async { state.tasks.recent(&identity, RECENT_TASKS).await.map_err(ApiError::from) },
    )?;

    Ok(Json(DashboardResponse {
        name: account.name,
        stats,
        recent_tasks,
    }))
}
