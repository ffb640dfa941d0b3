use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::adapter::handler::{AppState, ServiceError};

/// Authorization ヘッダーから Bearer トークンを取り出すヘルパー。
/// ヘッダーがない・形式が違う場合は None を返す。
pub fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    let auth_header = req.headers().get(axum::http::header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// auth_middleware は Bearer トークンを検証して、Request extension に Claims を格納する axum ミドルウェア。
/// トークンにパーミッションが含まれない場合はロールから解決して補う。
/// トークンが存在しないか無効な場合は 401 Unauthorized を返す。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(&req) else {
        return ServiceError::unauthorized(
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        )
        .into_response();
    };

    let mut claims = match state.token_verifier.verify_token(&token).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "token verification failed");
            return ServiceError::unauthorized("TOKEN_INVALID", "Token validation failed")
                .into_response();
        }
    };

    if claims.permissions.is_empty() {
        match state
            .resolve_user_permissions_uc
            .execute(&claims.role, claims.is_derived)
            .await
        {
            Ok(packed) => claims.permissions = packed,
            Err(e) => return ServiceError::from(e).into_response(),
        }
    }

    req.extensions_mut().insert(claims);
    next.run(req).await
}
