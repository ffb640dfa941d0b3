pub mod create_permissions_for_role;
pub mod get_permissions_for_role;
pub mod list_permissions;
pub mod list_permissions_for_role;
pub mod permissions_for_role_error;
pub mod record_entity_changes;
pub mod record_operation;
pub mod resolve_user_permissions;
pub mod search_changes_log;
pub mod search_operation_log;
pub mod update_permissions_for_role;

pub use create_permissions_for_role::CreatePermissionsForRoleUseCase;
pub use get_permissions_for_role::GetPermissionsForRoleUseCase;
pub use list_permissions::ListPermissionsUseCase;
pub use list_permissions_for_role::ListPermissionsForRoleUseCase;
pub use permissions_for_role_error::PermissionsForRoleError;
pub use record_entity_changes::RecordEntityChangesUseCase;
pub use record_operation::RecordOperationUseCase;
pub use resolve_user_permissions::ResolveUserPermissionsUseCase;
pub use search_changes_log::SearchChangesLogUseCase;
pub use search_operation_log::SearchOperationLogUseCase;
pub use update_permissions_for_role::UpdatePermissionsForRoleUseCase;
