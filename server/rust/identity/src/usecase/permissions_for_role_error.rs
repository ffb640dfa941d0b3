use crate::domain::repository::DuplicateRoleName;

/// PermissionsForRoleError はロール別パーミッション管理のエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum PermissionsForRoleError {
    #[error("permissions for role not found: {0}")]
    NotFound(String),

    #[error("permissions for role already exists: {0}")]
    AlreadyExists(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PermissionsForRoleError {
    /// リポジトリのエラーを分類する。ロール名の一意制約違反だけは AlreadyExists。
    pub fn from_repository(error: anyhow::Error) -> Self {
        match error.downcast_ref::<DuplicateRoleName>() {
            Some(DuplicateRoleName(role_name)) => Self::AlreadyExists(role_name.clone()),
            None => Self::Internal(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for PermissionsForRoleError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_repository_duplicate_is_conflict() {
        let err = PermissionsForRoleError::from_repository(
            DuplicateRoleName("parent".to_string()).into(),
        );
        assert!(matches!(err, PermissionsForRoleError::AlreadyExists(ref name) if name == "parent"));
    }

    #[test]
    fn test_from_repository_other_is_internal() {
        let err = PermissionsForRoleError::from_repository(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, PermissionsForRoleError::Internal(_)));
    }
}
