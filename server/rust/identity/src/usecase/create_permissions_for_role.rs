use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::{PermissionsForRoleError, RecordEntityChangesUseCase};
use crate::domain::entity::operation_log::OperationType;
use crate::domain::entity::permissions_for_role::{PermissionsForRole, PermissionsForRoleDto};
use crate::domain::repository::PermissionsForRoleRepository;

/// CreatePermissionsForRoleUseCase は新しいロールのパーミッションを登録する。
pub struct CreatePermissionsForRoleUseCase {
    repo: Arc<dyn PermissionsForRoleRepository>,
    record_changes_uc: Arc<RecordEntityChangesUseCase>,
}

impl CreatePermissionsForRoleUseCase {
    pub fn new(
        repo: Arc<dyn PermissionsForRoleRepository>,
        record_changes_uc: Arc<RecordEntityChangesUseCase>,
    ) -> Self {
        Self {
            repo,
            record_changes_uc,
        }
    }

    /// 登録と `user_id` による作成の監査ログを 1 つのトランザクションで書き込む。
    pub async fn execute(
        &self,
        dto: &PermissionsForRoleDto,
        user_id: &str,
    ) -> Result<PermissionsForRoleDto, PermissionsForRoleError> {
        dto.validate()?;

        let existing = self
            .repo
            .find_by_role_name(&dto.role_name)
            .await
            .map_err(PermissionsForRoleError::from_repository)?;
        if existing.is_some() {
            return Err(PermissionsForRoleError::AlreadyExists(dto.role_name.clone()));
        }

        let mut record = PermissionsForRole::from(dto);
        record.id = 0;
        let audit = self.record_changes_uc.audit_trail(
            PermissionsForRole::ENTITY_TYPE,
            OperationType::Create,
            user_id,
        );
        let created = self
            .repo
            .create_with_audit(&record, &audit)
            .await
            .map_err(PermissionsForRoleError::from_repository)?;

        info!(
            id = created.record.id,
            role_name = %created.record.role_name,
            packed_permissions = %created.record.packed_permissions,
            changes_logged = created.changes_logged,
            "permissions for role created"
        );
        Ok(PermissionsForRoleDto::from(created.record))
    }
}
