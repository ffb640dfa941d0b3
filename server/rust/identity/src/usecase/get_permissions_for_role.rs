use std::sync::Arc;

use super::PermissionsForRoleError;
use crate::domain::entity::permissions_for_role::PermissionsForRoleDto;
use crate::domain::repository::PermissionsForRoleRepository;

/// GetPermissionsForRoleUseCase はロール名でパーミッションを取得する。
pub struct GetPermissionsForRoleUseCase {
    repo: Arc<dyn PermissionsForRoleRepository>,
}

impl GetPermissionsForRoleUseCase {
    pub fn new(repo: Arc<dyn PermissionsForRoleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        role_name: &str,
    ) -> Result<PermissionsForRoleDto, PermissionsForRoleError> {
        let record = self
            .repo
            .find_by_role_name(role_name)
            .await
            .map_err(|e| PermissionsForRoleError::Internal(e.to_string()))?
            .ok_or_else(|| PermissionsForRoleError::NotFound(role_name.to_string()))?;

        Ok(PermissionsForRoleDto::from(record))
    }
}
