use async_trait::async_trait;

use crate::domain::entity::permissions_for_role::PermissionsForRole;
use crate::domain::service::{AuditTrail, Audited};

/// ロール名の一意制約に違反したことを表す。
/// リポジトリは `anyhow::Error` に包んで返し、呼び出し側は downcast で判別する。
#[derive(Debug, thiserror::Error)]
#[error("role name already exists: {0}")]
pub struct DuplicateRoleName(pub String);

/// PermissionsForRoleRepository はロール別パーミッションの永続化インターフェース。
///
/// 書き込みは監査ログ（変更ログと操作ログ）と同じトランザクションで行い、
/// どちらかが失敗すれば何も残さない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionsForRoleRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<PermissionsForRole>>;

    async fn find_by_role_name(&self, role_name: &str)
        -> anyhow::Result<Option<PermissionsForRole>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<PermissionsForRole>>;

    /// 新しいレコードを作成し、採番済みの id を持つレコードを返す。
    async fn create_with_audit(
        &self,
        record: &PermissionsForRole,
        audit: &AuditTrail,
    ) -> anyhow::Result<Audited<PermissionsForRole>>;

    /// id が一致するレコードを更新する。対象が存在しない場合は None を返す。
    async fn update_with_audit(
        &self,
        record: &PermissionsForRole,
        audit: &AuditTrail,
    ) -> anyhow::Result<Option<Audited<PermissionsForRole>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_find_by_role_name() {
        let mut mock = MockPermissionsForRoleRepository::new();
        mock.expect_find_by_role_name()
            .withf(|name| name == "parent")
            .returning(|_| {
                Ok(Some(PermissionsForRole {
                    id: 1,
                    role_name: "parent".to_string(),
                    packed_permissions: "1".to_string(),
                    description: None,
                }))
            });

        let found = mock.find_by_role_name("parent").await.unwrap();
        assert_eq!(found.unwrap().id, 1);
    }

    #[test]
    fn test_duplicate_role_name_survives_anyhow() {
        let err: anyhow::Error = DuplicateRoleName("parent".to_string()).into();
        let dup = err.downcast_ref::<DuplicateRoleName>().unwrap();
        assert_eq!(dup.0, "parent");
    }
}
