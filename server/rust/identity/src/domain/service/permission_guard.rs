use oos_permission::{has_permission, Permission};

/// PermissionGuard はパック済みパーミッション文字列に対する認可判定を行う。
pub struct PermissionGuard;

impl PermissionGuard {
    /// 必要なパーミッションが許可されているかを判定する。
    ///
    /// - `NotSet` を要求された場合は常に拒否
    /// - `AccessAll` を持つ場合は常に許可
    pub fn is_allowed(packed: &str, required: Permission) -> bool {
        if required == Permission::NotSet {
            return false;
        }
        has_permission(packed, Permission::AccessAll) || has_permission(packed, required)
    }
}
