use async_trait::async_trait;

use crate::domain::entity::operation_log::{OperationLogEntry, OperationLogQuery};

/// OperationLogRepository は管理操作ログの永続化インターフェース。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperationLogRepository: Send + Sync {
    async fn append(&self, entry: &OperationLogEntry) -> anyhow::Result<()>;

    /// 操作ログを新しい順に検索する。(entries, total_count) を返す。
    async fn search(&self, query: &OperationLogQuery)
        -> anyhow::Result<(Vec<OperationLogEntry>, i64)>;
}
