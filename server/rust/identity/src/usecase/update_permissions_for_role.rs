use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::{PermissionsForRoleError, RecordEntityChangesUseCase};
use crate::domain::entity::operation_log::OperationType;
use crate::domain::entity::permissions_for_role::{PermissionsForRole, PermissionsForRoleDto};
use crate::domain::repository::PermissionsForRoleRepository;

/// UpdatePermissionsForRoleUseCase は既存ロールのパーミッションを更新する。
pub struct UpdatePermissionsForRoleUseCase {
    repo: Arc<dyn PermissionsForRoleRepository>,
    record_changes_uc: Arc<RecordEntityChangesUseCase>,
}

impl UpdatePermissionsForRoleUseCase {
    pub fn new(
        repo: Arc<dyn PermissionsForRoleRepository>,
        record_changes_uc: Arc<RecordEntityChangesUseCase>,
    ) -> Self {
        Self {
            repo,
            record_changes_uc,
        }
    }

    /// 更新と監査ログを 1 つのトランザクションで書き込む。
    /// 変更前の値はリポジトリがトランザクション内で読む。
    pub async fn execute(
        &self,
        dto: &PermissionsForRoleDto,
        user_id: &str,
    ) -> Result<PermissionsForRoleDto, PermissionsForRoleError> {
        dto.validate()?;

        // ロール名の変更で他レコードと重複しないこと
        let same_name = self
            .repo
            .find_by_role_name(&dto.role_name)
            .await
            .map_err(PermissionsForRoleError::from_repository)?;
        if same_name.is_some_and(|r| r.id != dto.id) {
            return Err(PermissionsForRoleError::AlreadyExists(dto.role_name.clone()));
        }

        let record = PermissionsForRole::from(dto);
        let audit = self.record_changes_uc.audit_trail(
            PermissionsForRole::ENTITY_TYPE,
            OperationType::Update,
            user_id,
        );
        let updated = self
            .repo
            .update_with_audit(&record, &audit)
            .await
            .map_err(PermissionsForRoleError::from_repository)?
            .ok_or_else(|| PermissionsForRoleError::NotFound(format!("id {}", dto.id)))?;

        info!(
            id = updated.record.id,
            role_name = %updated.record.role_name,
            packed_permissions = %updated.record.packed_permissions,
            changes_logged = updated.changes_logged,
            "permissions for role updated"
        );
        Ok(PermissionsForRoleDto::from(updated.record))
    }
}
