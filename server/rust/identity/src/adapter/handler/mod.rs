pub mod changes_log_handler;
pub mod error;
pub mod permissions_handler;

use std::collections::HashMap;
use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use oos_permission::Permission;
use tower_http::trace::TraceLayer;

use crate::adapter::middleware::auth::auth_middleware;
use crate::adapter::middleware::permission::require_permission;
use crate::domain::repository::{
    ChangesLogRepository, OperationLogRepository, PermissionsForRoleRepository,
};
use crate::infrastructure::TokenVerifier;
use crate::usecase::{
    CreatePermissionsForRoleUseCase, GetPermissionsForRoleUseCase, ListPermissionsForRoleUseCase,
    ListPermissionsUseCase, RecordEntityChangesUseCase, RecordOperationUseCase,
    ResolveUserPermissionsUseCase, SearchChangesLogUseCase, SearchOperationLogUseCase,
    UpdatePermissionsForRoleUseCase,
};

pub use error::{ErrorResponse, ServiceError};

#[derive(Clone)]
pub struct AppState {
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub resolve_user_permissions_uc: Arc<ResolveUserPermissionsUseCase>,
    pub list_permissions_uc: Arc<ListPermissionsUseCase>,
    pub list_permissions_for_role_uc: Arc<ListPermissionsForRoleUseCase>,
    pub get_permissions_for_role_uc: Arc<GetPermissionsForRoleUseCase>,
    pub create_permissions_for_role_uc: Arc<CreatePermissionsForRoleUseCase>,
    pub update_permissions_for_role_uc: Arc<UpdatePermissionsForRoleUseCase>,
    pub record_entity_changes_uc: Arc<RecordEntityChangesUseCase>,
    pub search_changes_log_uc: Arc<SearchChangesLogUseCase>,
    pub record_operation_uc: Arc<RecordOperationUseCase>,
    pub search_operation_log_uc: Arc<SearchOperationLogUseCase>,
}

impl AppState {
    pub fn new(
        token_verifier: Arc<dyn TokenVerifier>,
        permissions_repo: Arc<dyn PermissionsForRoleRepository>,
        changes_log_repo: Arc<dyn ChangesLogRepository>,
        operation_log_repo: Arc<dyn OperationLogRepository>,
        tracked_properties: HashMap<String, Vec<String>>,
    ) -> Self {
        let record_entity_changes_uc = Arc::new(RecordEntityChangesUseCase::new(
            changes_log_repo.clone(),
            tracked_properties,
        ));
        Self {
            token_verifier,
            resolve_user_permissions_uc: Arc::new(ResolveUserPermissionsUseCase::new(
                permissions_repo.clone(),
            )),
            list_permissions_uc: Arc::new(ListPermissionsUseCase::new()),
            list_permissions_for_role_uc: Arc::new(ListPermissionsForRoleUseCase::new(
                permissions_repo.clone(),
            )),
            get_permissions_for_role_uc: Arc::new(GetPermissionsForRoleUseCase::new(
                permissions_repo.clone(),
            )),
            create_permissions_for_role_uc: Arc::new(CreatePermissionsForRoleUseCase::new(
                permissions_repo.clone(),
                record_entity_changes_uc.clone(),
            )),
            update_permissions_for_role_uc: Arc::new(UpdatePermissionsForRoleUseCase::new(
                permissions_repo,
                record_entity_changes_uc.clone(),
            )),
            record_entity_changes_uc,
            search_changes_log_uc: Arc::new(SearchChangesLogUseCase::new(changes_log_repo)),
            record_operation_uc: Arc::new(RecordOperationUseCase::new(
                operation_log_repo.clone(),
            )),
            search_operation_log_uc: Arc::new(SearchOperationLogUseCase::new(
                operation_log_repo,
            )),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let permission_routes = Router::new()
        .route(
            "/api/v1/permissions",
            get(permissions_handler::list_permissions),
        )
        .route(
            "/api/v1/permissions-for-role",
            get(permissions_handler::list_permissions_for_role)
                .post(permissions_handler::create_permissions_for_role)
                .put(permissions_handler::update_permissions_for_role),
        )
        .route(
            "/api/v1/permissions-for-role/{role_name}",
            get(permissions_handler::get_permissions_for_role),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(Permission::SystemManagement),
        ));

    let changes_log_routes = Router::new()
        .route(
            "/api/v1/changes-log",
            get(changes_log_handler::search_changes_log),
        )
        .route(
            "/api/v1/changes-log/operations",
            get(changes_log_handler::search_operation_log),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(Permission::LogDataRead),
        ));

    let protected = Router::new()
        .merge(permission_routes)
        .merge(changes_log_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public = Router::new().route("/healthz", get(healthz));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
