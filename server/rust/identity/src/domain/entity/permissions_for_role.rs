use std::collections::HashMap;

use oos_permission::{pack, unpack, Permission};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::changes_log::EntityId;
use super::tracked_entity::TrackedEntity;

/// PermissionsForRole はロール名とパック済みパーミッション文字列の対応を表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionsForRole {
    pub id: i64,
    pub role_name: String,
    pub packed_permissions: String,
    pub description: Option<String>,
}

impl PermissionsForRole {
    /// 変更ログ上のエンティティ種別名。
    pub const ENTITY_TYPE: &'static str = "PermissionsForRole";
}

impl TrackedEntity for PermissionsForRole {
    fn entity_type(&self) -> &str {
        Self::ENTITY_TYPE
    }

    fn entity_id(&self) -> EntityId {
        EntityId::Long(self.id)
    }

    fn project(&self) -> HashMap<String, String> {
        let mut values = HashMap::from([
            ("RoleName".to_string(), self.role_name.clone()),
            (
                "PackedPermissions".to_string(),
                self.packed_permissions.clone(),
            ),
        ]);
        if let Some(ref description) = self.description {
            values.insert("Description".to_string(), description.clone());
        }
        values
    }
}

/// PermissionsForRoleDto は API で受け渡すパーミッションを展開した表現。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct PermissionsForRoleDto {
    #[serde(default)]
    pub id: i64,
    #[validate(length(min = 1, max = 50, message = "role_name must be 1 to 50 characters"))]
    pub role_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&PermissionsForRole> for PermissionsForRoleDto {
    fn from(entity: &PermissionsForRole) -> Self {
        Self {
            id: entity.id,
            role_name: entity.role_name.clone(),
            permissions: unpack(&entity.packed_permissions).into_iter().collect(),
            description: entity.description.clone(),
        }
    }
}

impl From<PermissionsForRole> for PermissionsForRoleDto {
    fn from(entity: PermissionsForRole) -> Self {
        Self::from(&entity)
    }
}

impl From<&PermissionsForRoleDto> for PermissionsForRole {
    fn from(dto: &PermissionsForRoleDto) -> Self {
        Self {
            id: dto.id,
            role_name: dto.role_name.clone(),
            packed_permissions: pack(dto.permissions.iter().copied()),
            description: dto.description.clone(),
        }
    }
}
