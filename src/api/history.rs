use axum::extract::{Query, State};
use serde::Deserialize;
use validator::Validate;

use super::{error::ApiError, response::ApiResponse, AppState};
use crate::domain::StepResult;

#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    /// Return only the newest `limit` entries
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// GET /api/v1/history - the window in arrival order, oldest first
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<ApiResponse<Vec<StepResult>>, ApiError> {
    query.validate()?;

    let history = state.runtime.history();
    let rows = match query.limit {
        Some(limit) => history.recent(limit),
        None => history.snapshot(),
    };
    let count = rows.len();

    Ok(ApiResponse::success(rows).with_count(count))
}
