use oos_permission::{Permission, PermissionCatalog};
use serde::Serialize;

/// PermissionInfo は管理者向けに提示するパーミッションの説明。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PermissionInfo {
    pub code: i16,
    pub name: &'static str,
    pub group: &'static str,
    pub description: String,
}

/// ListPermissionsUseCase は現行カタログに登録された全パーミッションを返す。
#[derive(Default)]
pub struct ListPermissionsUseCase;

impl ListPermissionsUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self) -> Vec<PermissionInfo> {
        PermissionCatalog::<Permission>::current()
            .flags()
            .map(|p| PermissionInfo {
                code: p.code(),
                name: p.name(),
                group: p.group(),
                description: p.describe(),
            })
            .collect()
    }
}
