use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::entity::changes_log::{
    ChangesLogEntry, ChangesLogQuery, EntityId, SearchResult,
};
use crate::domain::repository::ChangesLogRepository;

const DEFAULT_SIZE: i64 = 12;
const MAX_SIZE: i64 = 100;

/// SearchChangesLogError は変更ログ検索に関するエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum SearchChangesLogError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// ChangesLogFilter は変更ログ検索のクエリパラメータを表す。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangesLogFilter {
    pub entity_type: Option<String>,
    pub property_name: Option<String>,
    pub entity_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search_string: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// SearchChangesLogUseCase は変更ログ検索ユースケース。
pub struct SearchChangesLogUseCase {
    changes_log_repo: Arc<dyn ChangesLogRepository>,
}

impl SearchChangesLogUseCase {
    pub fn new(changes_log_repo: Arc<dyn ChangesLogRepository>) -> Self {
        Self { changes_log_repo }
    }

    /// 変更ログを新しい順に検索する。
    pub async fn execute(
        &self,
        filter: &ChangesLogFilter,
    ) -> Result<SearchResult<ChangesLogEntry>, SearchChangesLogError> {
        let query = build_query(filter)?;

        let (entities, total_amount) = self
            .changes_log_repo
            .search(&query)
            .await
            .map_err(|e| SearchChangesLogError::Internal(e.to_string()))?;

        Ok(SearchResult {
            entities,
            total_amount,
        })
    }
}

fn build_query(filter: &ChangesLogFilter) -> Result<ChangesLogQuery, SearchChangesLogError> {
    let entity_type = filter
        .entity_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SearchChangesLogError::Validation("entity_type is required".to_string()))?;

    let (offset, limit) = parse_paging(filter.from, filter.size)?;
    let (updated_from, updated_before) =
        parse_date_range(filter.date_from.as_deref(), filter.date_to.as_deref())?;

    Ok(ChangesLogQuery {
        entity_type: entity_type.to_string(),
        property_name: filter.property_name.clone().filter(|s| !s.is_empty()),
        entity_id: filter.entity_id.as_deref().and_then(EntityId::parse),
        updated_from,
        updated_before,
        search_words: split_search_words(filter.search_string.as_deref()),
        offset,
        limit,
    })
}

/// `from`（既定 0）と `size`（既定 12、1..=100）を検証して (offset, limit) を返す。
pub(super) fn parse_paging(
    from: Option<i64>,
    size: Option<i64>,
) -> Result<(i64, i64), SearchChangesLogError> {
    let offset = from.unwrap_or(0);
    if offset < 0 {
        return Err(SearchChangesLogError::Validation(
            "from must be >= 0".to_string(),
        ));
    }
    let limit = size.unwrap_or(DEFAULT_SIZE);
    if !(1..=MAX_SIZE).contains(&limit) {
        return Err(SearchChangesLogError::Validation(format!(
            "size must be between 1 and {MAX_SIZE}"
        )));
    }
    Ok((offset, limit))
}

/// 日付の範囲を [from, before) の日時に変換する。date_to はその日の終わりまで含める。
pub(super) fn parse_date_range(
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), SearchChangesLogError> {
    let date_from = date_from.map(|s| parse_date(s, "date_from")).transpose()?;
    let date_to = date_to.map(|s| parse_date(s, "date_to")).transpose()?;
    Ok((
        date_from.map(start_of_day),
        date_to.and_then(|d| d.succ_opt()).map(start_of_day),
    ))
}

/// 検索文字列を空白とカンマで語に分ける。
pub(super) fn split_search_words(search_string: Option<&str>) -> Vec<String> {
    search_string
        .map(|s| {
            s.split([' ', ','])
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// `YYYY-MM-DD` または RFC 3339 の日時を受け付け、日付部分だけを使う。
fn parse_date(value: &str, field: &str) -> Result<NaiveDate, SearchChangesLogError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| SearchChangesLogError::Validation(format!("invalid {field}: {value}")))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
