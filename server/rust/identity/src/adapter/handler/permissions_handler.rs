use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::{AppState, ServiceError};
use crate::domain::entity::permissions_for_role::PermissionsForRoleDto;
use crate::domain::entity::Claims;

/// カタログに登録された全パーミッションの説明を返す。
pub async fn list_permissions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.list_permissions_uc.execute())
}

/// 全ロールのパーミッションを返す。1 件もなければ 204。
pub async fn list_permissions_for_role(
    State(state): State<AppState>,
) -> Result<Response, ServiceError> {
    let records = state.list_permissions_for_role_uc.execute().await?;
    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(records).into_response())
}

pub async fn get_permissions_for_role(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
) -> Result<Json<PermissionsForRoleDto>, ServiceError> {
    let dto = state.get_permissions_for_role_uc.execute(&role_name).await?;
    Ok(Json(dto))
}

pub async fn create_permissions_for_role(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(dto): Json<PermissionsForRoleDto>,
) -> Result<(StatusCode, Json<PermissionsForRoleDto>), ServiceError> {
    let created = state
        .create_permissions_for_role_uc
        .execute(&dto, &claims.sub)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_permissions_for_role(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(dto): Json<PermissionsForRoleDto>,
) -> Result<Json<PermissionsForRoleDto>, ServiceError> {
    let updated = state
        .update_permissions_for_role_uc
        .execute(&dto, &claims.sub)
        .await?;
    Ok(Json(updated))
}
