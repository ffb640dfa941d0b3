use std::sync::Arc;

use oos_permission::{pack, Permission};
use tracing::debug;

use super::PermissionsForRoleError;
use crate::domain::repository::PermissionsForRoleRepository;

const PROVIDER_ROLE: &str = "provider";
const ADMIN_SUFFIX: &str = "Admin";

/// ResolveUserPermissionsUseCase はトークン発行時にユーザーのパック済みパーミッションを解決する。
pub struct ResolveUserPermissionsUseCase {
    repo: Arc<dyn PermissionsForRoleRepository>,
}

impl ResolveUserPermissionsUseCase {
    pub fn new(repo: Arc<dyn PermissionsForRoleRepository>) -> Self {
        Self { repo }
    }

    /// ロールに対応するパック済みパーミッションを返す。
    ///
    /// 派生プロバイダーユーザー（事業者の管理者）は `providerAdmin` の設定を使う。
    /// レコードがなければ `NotSet` だけを持つ文字列を返す。
    pub async fn execute(
        &self,
        role: &str,
        is_derived: bool,
    ) -> Result<String, PermissionsForRoleError> {
        let role_name = if role == PROVIDER_ROLE && is_derived {
            format!("{role}{ADMIN_SUFFIX}")
        } else {
            role.to_string()
        };

        let record = self
            .repo
            .find_by_role_name(&role_name)
            .await
            .map_err(|e| PermissionsForRoleError::Internal(e.to_string()))?;

        match record {
            Some(r) => Ok(r.packed_permissions),
            None => {
                debug!(role_name = %role_name, "no permissions configured for role");
                Ok(pack([Permission::NotSet]))
            }
        }
    }
}
