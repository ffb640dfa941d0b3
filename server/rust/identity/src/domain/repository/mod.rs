pub mod changes_log_repository;
pub mod operation_log_repository;
pub mod permissions_for_role_repository;

pub use changes_log_repository::ChangesLogRepository;
pub use operation_log_repository::OperationLogRepository;
pub use permissions_for_role_repository::{DuplicateRoleName, PermissionsForRoleRepository};
