use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::changes_log_recorder::{ChangeSubject, ChangesLogError, ChangesLogRecorder};
use crate::domain::entity::changes_log::ChangesLogEntry;
use crate::domain::entity::operation_log::{OperationLogEntry, OperationType};
use crate::domain::entity::tracked_entity::TrackedEntity;

/// AuditTrail は業務データの書き込みに添える監査の文脈。
///
/// リポジトリは書き込み後の実体（採番済み id を含む）から `entries_for` で監査行を作り、
/// 業務データと同じトランザクションで保存する。
#[derive(Debug, Clone, PartialEq)]
pub struct AuditTrail {
    pub user_id: String,
    pub operation_type: OperationType,
    /// 空ならプロパティ単位の変更ログは残さず、操作ログだけを残す。
    pub tracked_properties: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// AuditEntries は 1 回の書き込みで保存する監査行一式。
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntries {
    pub changes: Vec<ChangesLogEntry>,
    pub operation: OperationLogEntry,
}

/// Audited は監査付きで書き込んだ結果。
#[derive(Debug, Clone, PartialEq)]
pub struct Audited<T> {
    pub record: T,
    pub changes_logged: usize,
}

impl AuditTrail {
    pub fn new(
        user_id: impl Into<String>,
        operation_type: OperationType,
        tracked_properties: Vec<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            operation_type,
            tracked_properties,
            timestamp: Utc::now(),
        }
    }

    /// 変更前後の実体から監査行を作る。作成時は `old` が None。
    pub fn entries_for<T: TrackedEntity>(
        &self,
        old: Option<&T>,
        new: &T,
    ) -> Result<AuditEntries, ChangesLogError> {
        let subject = ChangeSubject::new(new.entity_type().to_string(), new.entity_id());
        let changes = if self.tracked_properties.is_empty() {
            vec![]
        } else {
            ChangesLogRecorder::detect_changes(
                Some(&subject),
                &self.tracked_properties,
                &old.map(TrackedEntity::project).unwrap_or_default(),
                &new.project(),
                &self.user_id,
                self.timestamp,
            )?
        };
        let operation = OperationLogEntry {
            id: Uuid::new_v4(),
            entity_type: subject.entity_type,
            entity_id: subject.entity_id,
            operation_type: self.operation_type,
            operation_date: self.timestamp,
            user_id: self.user_id.clone(),
        };
        Ok(AuditEntries { changes, operation })
    }
}
