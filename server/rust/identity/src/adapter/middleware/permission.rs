use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use oos_permission::Permission;
use tracing::debug;

use crate::adapter::handler::{AppState, ServiceError};
use crate::domain::entity::Claims;
use crate::domain::service::PermissionGuard;

/// require_permission は Claims のパック済みパーミッションに `required` が含まれるかを確認する
/// axum ミドルウェアを返す。
///
/// Claims が extension に存在しない場合は 401 Unauthorized、
/// パーミッションが不足する場合は 403 Forbidden を返す。
pub fn require_permission(
    required: Permission,
) -> impl Fn(
    State<AppState>,
    Request<axum::body::Body>,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |_state: State<AppState>, req: Request<axum::body::Body>, next: Next| {
        Box::pin(permission_check(req, next, required))
    }
}

async fn permission_check(
    req: Request<axum::body::Body>,
    next: Next,
    required: Permission,
) -> Response {
    let Some(claims) = req.extensions().get::<Claims>() else {
        return ServiceError::unauthorized(
            "MISSING_CLAIMS",
            "Authentication is required. Please provide a valid Bearer token.",
        )
        .into_response();
    };

    if PermissionGuard::is_allowed(&claims.permissions, required) {
        next.run(req).await
    } else {
        debug!(sub = %claims.sub, required = %required, "permission denied");
        ServiceError::forbidden(format!(
            "Insufficient permissions: '{required}' is required."
        ))
        .into_response()
    }
}
