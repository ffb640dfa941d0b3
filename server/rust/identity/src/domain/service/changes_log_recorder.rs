use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entity::changes_log::{ChangesLogEntry, EntityId, MAX_VALUE_LENGTH};
use crate::domain::repository::ChangesLogRepository;

/// ChangesLogError は変更ログ記録のエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum ChangesLogError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// ChangeSubject は変更ログの記録対象エンティティを識別する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSubject {
    pub entity_type: String,
    pub entity_id: EntityId,
}

impl ChangeSubject {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<EntityId>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }
}

/// ChangesLogRecorder は追跡対象プロパティの変更を検出し、変更ログとして追記する。
pub struct ChangesLogRecorder {
    repo: Arc<dyn ChangesLogRepository>,
}

impl ChangesLogRecorder {
    pub fn new(repo: Arc<dyn ChangesLogRepository>) -> Self {
        Self { repo }
    }

    /// 変更前後の射影を比較し、値が変わったプロパティごとにエントリを作る。
    ///
    /// 存在しない値は空文字列として比較し、NULL として保存する。
    /// 比較は保存される切り詰め後の値で行う。
    pub fn detect_changes(
        subject: Option<&ChangeSubject>,
        tracked_properties: &[String],
        old: &HashMap<String, String>,
        new: &HashMap<String, String>,
        user_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<ChangesLogEntry>, ChangesLogError> {
        let subject = subject.ok_or_else(|| {
            ChangesLogError::InvalidArgument("subject entity is required".to_string())
        })?;

        let mut seen = HashSet::new();
        let entries = tracked_properties
            .iter()
            .filter(|property| seen.insert(property.as_str()))
            .filter_map(|property| {
                let old_value = old.get(property).map(|v| truncate(v));
                let new_value = new.get(property).map(|v| truncate(v));
                if old_value.as_deref().unwrap_or("") == new_value.as_deref().unwrap_or("") {
                    return None;
                }
                Some(ChangesLogEntry {
                    id: Uuid::new_v4(),
                    entity_type: subject.entity_type.clone(),
                    property_name: property.clone(),
                    entity_id: subject.entity_id,
                    old_value,
                    new_value,
                    updated_date: timestamp,
                    user_id: user_id.to_string(),
                })
            })
            .collect();
        Ok(entries)
    }

    /// 変更を検出して 1 回の追記で永続化し、書き込んだ件数を返す。
    pub async fn record_changes(
        &self,
        subject: Option<&ChangeSubject>,
        tracked_properties: &[String],
        old: &HashMap<String, String>,
        new: &HashMap<String, String>,
        user_id: &str,
    ) -> Result<usize, ChangesLogError> {
        let entries =
            Self::detect_changes(subject, tracked_properties, old, new, user_id, Utc::now())?;
        if entries.is_empty() {
            return Ok(0);
        }

        self.repo.append(&entries).await?;

        debug!(
            entity_type = %entries[0].entity_type,
            entity_id = %entries[0].entity_id,
            count = entries.len(),
            "changes log entries appended"
        );
        Ok(entries.len())
    }
}

fn truncate(value: &str) -> String {
    match value.char_indices().nth(MAX_VALUE_LENGTH) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
