use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::changes_log::EntityId;

/// OperationType は管理操作の種別を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Create,
    Update,
    Delete,
    Block,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Block => "Block",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    /// 大文字小文字を区別せずに解釈する。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "block" => Ok(Self::Block),
            _ => Err(format!("unknown operation type: {s}")),
        }
    }
}

/// OperationLogEntry は誰がどのエンティティにどの操作をしたかの記録。
/// プロパティ単位の差分は ChangesLogEntry 側に残る。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationLogEntry {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: EntityId,
    pub operation_type: OperationType,
    pub operation_date: DateTime<Utc>,
    pub user_id: String,
}

/// OperationLogQuery は検証済みの操作ログ検索条件を表す。
///
/// `operated_before` は排他的上限。
#[derive(Debug, Clone, PartialEq)]
pub struct OperationLogQuery {
    pub entity_type: Option<String>,
    pub operation_type: Option<OperationType>,
    pub operated_from: Option<DateTime<Utc>>,
    pub operated_before: Option<DateTime<Utc>>,
    pub search_words: Vec<String>,
    pub offset: i64,
    pub limit: i64,
}

impl Default for OperationLogQuery {
    fn default() -> Self {
        Self {
            entity_type: None,
            operation_type: None,
            operated_from: None,
            operated_before: None,
            search_words: vec![],
            offset: 0,
            limit: 12,
        }
    }
}

impl OperationLogQuery {
    /// エントリが条件に一致するかを判定する。検索語は操作したユーザー id の前方一致。
    pub fn matches(&self, entry: &OperationLogEntry) -> bool {
        if let Some(ref entity_type) = self.entity_type {
            if &entry.entity_type != entity_type {
                return false;
            }
        }
        if let Some(operation_type) = self.operation_type {
            if entry.operation_type != operation_type {
                return false;
            }
        }
        if let Some(from) = self.operated_from {
            if entry.operation_date < from {
                return false;
            }
        }
        if let Some(before) = self.operated_before {
            if entry.operation_date >= before {
                return false;
            }
        }
        if self.search_words.is_empty() {
            return true;
        }
        let user_id = entry.user_id.to_lowercase();
        self.search_words
            .iter()
            .any(|word| user_id.starts_with(&word.to_lowercase()))
    }
}
