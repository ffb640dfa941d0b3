use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::entity::operation_log::OperationType;
use crate::domain::entity::tracked_entity::TrackedEntity;
use crate::domain::repository::ChangesLogRepository;
use crate::domain::service::{AuditTrail, ChangeSubject, ChangesLogError, ChangesLogRecorder};

/// RecordEntityChangesUseCase は設定で追跡対象とされたエンティティの変更を変更ログに記録する。
pub struct RecordEntityChangesUseCase {
    recorder: ChangesLogRecorder,
    tracked_properties: HashMap<String, Vec<String>>,
}

impl RecordEntityChangesUseCase {
    /// `tracked_properties` はエンティティ種別から追跡対象プロパティ名への対応。
    pub fn new(
        changes_log_repo: Arc<dyn ChangesLogRepository>,
        tracked_properties: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            recorder: ChangesLogRecorder::new(changes_log_repo),
            tracked_properties,
        }
    }

    /// 業務データと同じトランザクションで保存するための監査文脈を作る。
    /// 追跡対象外の種別なら操作ログだけが残る。
    pub fn audit_trail(
        &self,
        entity_type: &str,
        operation_type: OperationType,
        user_id: &str,
    ) -> AuditTrail {
        let tracked = self
            .tracked_properties
            .get(entity_type)
            .cloned()
            .unwrap_or_default();
        AuditTrail::new(user_id, operation_type, tracked)
    }

    /// 射影済みの値で変更を記録し、書き込んだ件数を返す。
    /// 追跡対象外のエンティティ種別なら何もせず 0 を返す。
    pub async fn execute(
        &self,
        subject: Option<&ChangeSubject>,
        old: &HashMap<String, String>,
        new: &HashMap<String, String>,
        user_id: &str,
    ) -> Result<usize, ChangesLogError> {
        let subject = subject.ok_or_else(|| {
            ChangesLogError::InvalidArgument("subject entity is required".to_string())
        })?;

        let Some(tracked) = self.tracked_properties.get(&subject.entity_type) else {
            debug!(
                entity_type = %subject.entity_type,
                "changes logging is not enabled for entity type"
            );
            return Ok(0);
        };

        debug!(entity_type = %subject.entity_type, "changes logging started");
        let count = self
            .recorder
            .record_changes(Some(subject), tracked, old, new, user_id)
            .await?;
        debug!(entity_type = %subject.entity_type, count, "changes logging finished");
        Ok(count)
    }

    /// エンティティの変更前後から変更を記録する。
    ///
    /// 作成時は `old` が、削除時は `new` が None になる。両方 None はエラー。
    pub async fn execute_for<T: TrackedEntity + Sync>(
        &self,
        old: Option<&T>,
        new: Option<&T>,
        user_id: &str,
    ) -> Result<usize, ChangesLogError> {
        let subject = new.or(old).map(|entity| {
            ChangeSubject::new(entity.entity_type().to_string(), entity.entity_id())
        });
        let old_values = old.map(TrackedEntity::project).unwrap_or_default();
        let new_values = new.map(TrackedEntity::project).unwrap_or_default();
        self.execute(subject.as_ref(), &old_values, &new_values, user_id)
            .await
    }
}
