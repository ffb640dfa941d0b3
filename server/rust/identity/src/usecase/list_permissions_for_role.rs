use std::sync::Arc;

use tracing::info;

use super::PermissionsForRoleError;
use crate::domain::entity::permissions_for_role::PermissionsForRoleDto;
use crate::domain::repository::PermissionsForRoleRepository;

/// ListPermissionsForRoleUseCase は全ロールのパーミッション一覧を返す。
pub struct ListPermissionsForRoleUseCase {
    repo: Arc<dyn PermissionsForRoleRepository>,
}

impl ListPermissionsForRoleUseCase {
    pub fn new(repo: Arc<dyn PermissionsForRoleRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<PermissionsForRoleDto>, PermissionsForRoleError> {
        let records = self
            .repo
            .find_all()
            .await
            .map_err(|e| PermissionsForRoleError::Internal(e.to_string()))?;

        if records.is_empty() {
            info!("no permissions for roles found");
        } else {
            info!(count = records.len(), "permissions for roles loaded");
        }

        Ok(records.iter().map(PermissionsForRoleDto::from).collect())
    }
}
