use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{AppState, ServiceError};
use crate::usecase::search_changes_log::ChangesLogFilter;
use crate::usecase::search_operation_log::OperationLogFilter;

/// 変更ログを検索する。該当がなければ 204。
pub async fn search_changes_log(
    State(state): State<AppState>,
    Query(filter): Query<ChangesLogFilter>,
) -> Result<Response, ServiceError> {
    let result = state.search_changes_log_uc.execute(&filter).await?;
    if result.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(result).into_response())
}

/// 管理操作ログを検索する。該当がなければ 204。
pub async fn search_operation_log(
    State(state): State<AppState>,
    Query(filter): Query<OperationLogFilter>,
) -> Result<Response, ServiceError> {
    let result = state.search_operation_log_uc.execute(&filter).await?;
    if result.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(result).into_response())
}
