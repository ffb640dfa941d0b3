use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 変更ログに保存する値の最大文字数。
pub const MAX_VALUE_LENGTH: usize = 500;

/// EntityId は変更対象エンティティの主キーを表す。
/// GUID キーと整数キーのどちらか一方だけを持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Guid(Uuid),
    Long(i64),
}

impl EntityId {
    /// 文字列を GUID、整数の順に解釈する。どちらでもなければ None。
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(guid) = Uuid::parse_str(value) {
            return Some(Self::Guid(guid));
        }
        value.parse::<i64>().ok().map(Self::Long)
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self {
            Self::Guid(id) => Some(*id),
            Self::Long(_) => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(id) => Some(*id),
            Self::Guid(_) => None,
        }
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        Self::Guid(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Long(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guid(id) => write!(f, "{id}"),
            Self::Long(id) => write!(f, "{id}"),
        }
    }
}

/// ChangesLogEntry は追跡対象プロパティ 1 件分の変更記録を表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangesLogEntry {
    pub id: Uuid,
    pub entity_type: String,
    pub property_name: String,
    pub entity_id: EntityId,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub updated_date: DateTime<Utc>,
    pub user_id: String,
}

/// ChangesLogQuery は検証済みの変更ログ検索条件を表す。
///
/// `updated_before` は排他的上限。
#[derive(Debug, Clone, PartialEq)]
pub struct ChangesLogQuery {
    pub entity_type: String,
    pub property_name: Option<String>,
    pub entity_id: Option<EntityId>,
    pub updated_from: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    pub search_words: Vec<String>,
    pub offset: i64,
    pub limit: i64,
}

impl ChangesLogQuery {
    /// エンティティ種別だけを指定した既定の条件を作る。
    pub fn for_entity_type(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            property_name: None,
            entity_id: None,
            updated_from: None,
            updated_before: None,
            search_words: vec![],
            offset: 0,
            limit: 12,
        }
    }

    /// エントリが条件に一致するかを判定する。ページングは考慮しない。
    pub fn matches(&self, entry: &ChangesLogEntry) -> bool {
        if entry.entity_type != self.entity_type {
            return false;
        }
        if let Some(ref name) = self.property_name {
            if &entry.property_name != name {
                return false;
            }
        }
        if let Some(id) = self.entity_id {
            if entry.entity_id != id {
                return false;
            }
        }
        if let Some(from) = self.updated_from {
            if entry.updated_date < from {
                return false;
            }
        }
        if let Some(before) = self.updated_before {
            if entry.updated_date >= before {
                return false;
            }
        }
        if self.search_words.is_empty() {
            return true;
        }
        self.search_words.iter().any(|word| {
            let word = word.to_lowercase();
            let contains = |value: &Option<String>| {
                value
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&word))
            };
            contains(&entry.old_value)
                || contains(&entry.new_value)
                || entry.user_id.to_lowercase().starts_with(&word)
        })
    }
}

/// SearchResult は検索結果の 1 ページと総件数を表す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult<T> {
    pub entities: Vec<T>,
    pub total_amount: i64,
}

impl<T> SearchResult<T> {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(property: &str, old: Option<&str>, new: Option<&str>, user: &str) -> ChangesLogEntry {
        ChangesLogEntry {
            id: Uuid::new_v4(),
            entity_type: "Provider".to_string(),
            property_name: property.to_string(),
            entity_id: EntityId::Long(7),
            old_value: old.map(String::from),
            new_value: new.map(String::from),
            updated_date: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
            user_id: user.to_string(),
        }
    }

    #[test]
    fn test_entity_id_parse_prefers_guid() {
        let guid = Uuid::new_v4();
        assert_eq!(EntityId::parse(&guid.to_string()), Some(EntityId::Guid(guid)));
        assert_eq!(EntityId::parse("42"), Some(EntityId::Long(42)));
        assert_eq!(EntityId::parse("not-an-id"), None);
    }

    #[test]
    fn test_entity_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&EntityId::Long(5)).unwrap(), "5");
        let guid = Uuid::nil();
        assert_eq!(
            serde_json::to_string(&EntityId::Guid(guid)).unwrap(),
            format!("\"{guid}\"")
        );
    }

    #[test]
    fn test_matches_entity_type_and_property() {
        let mut query = ChangesLogQuery::for_entity_type("Provider");
        assert!(query.matches(&entry("FullTitle", None, Some("A"), "u1")));

        query.property_name = Some("Director".to_string());
        assert!(!query.matches(&entry("FullTitle", None, Some("A"), "u1")));

        let other = ChangesLogQuery::for_entity_type("Application");
        assert!(!other.matches(&entry("FullTitle", None, Some("A"), "u1")));
    }

    #[test]
    fn test_matches_date_bounds() {
        let mut query = ChangesLogQuery::for_entity_type("Provider");
        query.updated_from = Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        query.updated_before = Some(Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap());
        assert!(query.matches(&entry("FullTitle", None, None, "u1")));

        query.updated_before = Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());
        assert!(!query.matches(&entry("FullTitle", None, None, "u1")));
    }

    #[test]
    fn test_matches_search_words() {
        let mut query = ChangesLogQuery::for_entity_type("Provider");
        query.search_words = vec!["school".to_string(), "nothing".to_string()];
        assert!(query.matches(&entry("FullTitle", Some("Old School"), None, "u1")));
        assert!(!query.matches(&entry("FullTitle", Some("Academy"), None, "u1")));

        query.search_words = vec!["ADM".to_string()];
        assert!(query.matches(&entry("FullTitle", None, None, "admin-1")));
        assert!(!query.matches(&entry("FullTitle", None, None, "superadmin")));
    }
}
