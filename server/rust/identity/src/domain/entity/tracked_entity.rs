use std::collections::HashMap;

use super::changes_log::EntityId;

/// TrackedEntity は変更ログの記録対象になれるエンティティを表す。
///
/// `project` はプロパティ名から記録用の文字列表現への写像を返す。
/// 値を持たないプロパティは含めない。
pub trait TrackedEntity {
    fn entity_type(&self) -> &str;
    fn entity_id(&self) -> EntityId;
    fn project(&self) -> HashMap<String, String>;
}

/// EntitySnapshot は任意のエンティティの射影済みスナップショット。
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub values: HashMap<String, String>,
}

impl EntitySnapshot {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<EntityId>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(property.into(), value.into());
        self
    }
}

impl TrackedEntity for EntitySnapshot {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    fn project(&self) -> HashMap<String, String> {
        self.values.clone()
    }
}
