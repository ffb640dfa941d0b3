use async_trait::async_trait;

use crate::domain::entity::changes_log::{ChangesLogEntry, ChangesLogQuery};

/// ChangesLogRepository は変更ログの永続化インターフェース。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChangesLogRepository: Send + Sync {
    /// 変更ログエントリをまとめて追記する。全件が書き込まれるか、1 件も書き込まれない。
    async fn append(&self, entries: &[ChangesLogEntry]) -> anyhow::Result<()>;

    /// 変更ログを検索する。(entries, total_count) を返す。
    async fn search(&self, query: &ChangesLogQuery)
        -> anyhow::Result<(Vec<ChangesLogEntry>, i64)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_changes_log_repository_append() {
        let mut mock = MockChangesLogRepository::new();
        mock.expect_append()
            .withf(|entries| entries.is_empty())
            .returning(|_| Ok(()));

        assert!(mock.append(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_changes_log_repository_search() {
        let mut mock = MockChangesLogRepository::new();
        mock.expect_search().returning(|_| Ok((vec![], 0)));

        let query = ChangesLogQuery::for_entity_type("Provider");
        let (entries, total) = mock.search(&query).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(total, 0);
    }
}
