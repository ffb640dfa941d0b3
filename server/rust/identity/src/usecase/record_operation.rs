use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entity::operation_log::{OperationLogEntry, OperationType};
use crate::domain::entity::tracked_entity::TrackedEntity;
use crate::domain::repository::OperationLogRepository;
use crate::domain::service::ChangesLogError;

/// RecordOperationUseCase は管理者による操作（作成・更新・削除・ブロック）を操作ログに残す。
///
/// プロパティ単位の差分を伴わない操作（削除やブロック）を記録する呼び出し側が使う。
pub struct RecordOperationUseCase {
    operation_log_repo: Arc<dyn OperationLogRepository>,
}

impl RecordOperationUseCase {
    pub fn new(operation_log_repo: Arc<dyn OperationLogRepository>) -> Self {
        Self { operation_log_repo }
    }

    pub async fn execute<T: TrackedEntity + Sync>(
        &self,
        entity: &T,
        operation_type: OperationType,
        user_id: &str,
    ) -> Result<OperationLogEntry, ChangesLogError> {
        let entry = OperationLogEntry {
            id: Uuid::new_v4(),
            entity_type: entity.entity_type().to_string(),
            entity_id: entity.entity_id(),
            operation_type,
            operation_date: Utc::now(),
            user_id: user_id.to_string(),
        };
        self.operation_log_repo.append(&entry).await?;

        info!(
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            operation_type = %entry.operation_type,
            user_id = %entry.user_id,
            "operation recorded"
        );
        Ok(entry)
    }
}
