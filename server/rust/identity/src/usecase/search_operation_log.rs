use std::sync::Arc;

use serde::Deserialize;

use super::search_changes_log::{
    parse_date_range, parse_paging, split_search_words, SearchChangesLogError,
};
use crate::domain::entity::changes_log::SearchResult;
use crate::domain::entity::operation_log::{OperationLogEntry, OperationLogQuery, OperationType};
use crate::domain::repository::OperationLogRepository;

/// OperationLogFilter は操作ログ検索のクエリパラメータを表す。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationLogFilter {
    pub entity_type: Option<String>,
    pub operation_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search_string: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// SearchOperationLogUseCase は管理操作ログの検索ユースケース。
pub struct SearchOperationLogUseCase {
    operation_log_repo: Arc<dyn OperationLogRepository>,
}

impl SearchOperationLogUseCase {
    pub fn new(operation_log_repo: Arc<dyn OperationLogRepository>) -> Self {
        Self { operation_log_repo }
    }

    pub async fn execute(
        &self,
        filter: &OperationLogFilter,
    ) -> Result<SearchResult<OperationLogEntry>, SearchChangesLogError> {
        let query = build_query(filter)?;

        let (entities, total_amount) = self
            .operation_log_repo
            .search(&query)
            .await
            .map_err(|e| SearchChangesLogError::Internal(e.to_string()))?;

        Ok(SearchResult {
            entities,
            total_amount,
        })
    }
}

fn build_query(filter: &OperationLogFilter) -> Result<OperationLogQuery, SearchChangesLogError> {
    let operation_type = filter
        .operation_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<OperationType>)
        .transpose()
        .map_err(SearchChangesLogError::Validation)?;
    let (offset, limit) = parse_paging(filter.from, filter.size)?;
    let (operated_from, operated_before) =
        parse_date_range(filter.date_from.as_deref(), filter.date_to.as_deref())?;

    Ok(OperationLogQuery {
        entity_type: filter
            .entity_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        operation_type,
        operated_from,
        operated_before,
        search_words: split_search_words(filter.search_string.as_deref()),
        offset,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::operation_log_repository::MockOperationLogRepository;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_build_query_defaults() {
        let query = build_query(&OperationLogFilter::default()).unwrap();
        assert_eq!(query, OperationLogQuery::default());
    }

    #[test]
    fn test_build_query_filters() {
        let filter = OperationLogFilter {
            entity_type: Some(" PermissionsForRole ".to_string()),
            operation_type: Some("block".to_string()),
            date_to: Some("2024-05-02".to_string()),
            search_string: Some("admin,tech".to_string()),
            size: Some(30),
            ..Default::default()
        };
        let query = build_query(&filter).unwrap();
        assert_eq!(query.entity_type.as_deref(), Some("PermissionsForRole"));
        assert_eq!(query.operation_type, Some(OperationType::Block));
        assert_eq!(
            query.operated_before,
            Some(Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap())
        );
        assert_eq!(query.search_words, vec!["admin", "tech"]);
        assert_eq!(query.limit, 30);
    }

    #[test]
    fn test_build_query_rejects_unknown_operation() {
        let filter = OperationLogFilter {
            operation_type: Some("Approve".to_string()),
            ..Default::default()
        };
        match build_query(&filter).unwrap_err() {
            SearchChangesLogError::Validation(msg) => assert!(msg.contains("Approve")),
            e => panic!("unexpected error: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_returns_search_result() {
        let mut mock = MockOperationLogRepository::new();
        mock.expect_search()
            .withf(|q| q.operation_type == Some(OperationType::Create))
            .returning(|_| Ok((vec![], 3)));

        let uc = SearchOperationLogUseCase::new(Arc::new(mock));
        let filter = OperationLogFilter {
            operation_type: Some("Create".to_string()),
            ..Default::default()
        };
        let result = uc.execute(&filter).await.unwrap();
        assert_eq!(result.total_amount, 3);
    }

    #[tokio::test]
    async fn test_execute_repository_error() {
        let mut mock = MockOperationLogRepository::new();
        mock.expect_search()
            .returning(|_| Err(anyhow::anyhow!("database unavailable")));

        let uc = SearchOperationLogUseCase::new(Arc::new(mock));
        let result = uc.execute(&OperationLogFilter::default()).await;
        assert!(matches!(result, Err(SearchChangesLogError::Internal(_))));
    }
}
