use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::domain::entity::changes_log::{ChangesLogEntry, ChangesLogQuery, EntityId};
use crate::domain::repository::ChangesLogRepository;

// 1 行あたり 9 パラメータ。PostgreSQL のバインド上限 65535 を超えない件数で分割する
const INSERT_CHUNK_SIZE: usize = 1000;

/// ChangesLogPostgresRepository は ChangesLogRepository の PostgreSQL 実装。
pub struct ChangesLogPostgresRepository {
    pool: PgPool,
}

impl ChangesLogPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 呼び出し側のトランザクション内で変更ログを書き込む。
    /// 業務データの更新と同じトランザクションでコミットする場合に使う。
    pub async fn insert_entries(
        conn: &mut PgConnection,
        entries: &[ChangesLogEntry],
    ) -> anyhow::Result<()> {
        for chunk in entries.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO changes_log (id, entity_type, property_name, entity_id_guid, entity_id_long, old_value, new_value, updated_date, user_id) ",
            );
            builder.push_values(chunk, |mut b, entry| {
                b.push_bind(entry.id)
                    .push_bind(entry.entity_type.clone())
                    .push_bind(entry.property_name.clone())
                    .push_bind(entry.entity_id.as_guid())
                    .push_bind(entry.entity_id.as_long())
                    .push_bind(entry.old_value.clone())
                    .push_bind(entry.new_value.clone())
                    .push_bind(entry.updated_date)
                    .push_bind(entry.user_id.clone());
            });
            builder.build().execute(&mut *conn).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ChangesLogRepository for ChangesLogPostgresRepository {
    async fn append(&self, entries: &[ChangesLogEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        Self::insert_entries(&mut tx, entries).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn search(
        &self,
        query: &ChangesLogQuery,
    ) -> anyhow::Result<(Vec<ChangesLogEntry>, i64)> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM changes_log WHERE ");
        push_conditions(&mut count_builder, query);
        let total_count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut data_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, entity_type, property_name, entity_id_guid, entity_id_long, old_value, new_value, updated_date, user_id FROM changes_log WHERE ",
        );
        push_conditions(&mut data_builder, query);
        data_builder.push(" ORDER BY updated_date DESC, id LIMIT ");
        data_builder.push_bind(query.limit);
        data_builder.push(" OFFSET ");
        data_builder.push_bind(query.offset);

        let rows: Vec<ChangesLogRow> = data_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;
        let entries = rows
            .into_iter()
            .map(ChangesLogEntry::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok((entries, total_count))
    }
}

/// WHERE 句の条件を組み立てる。検索語は語ごとに OR で結合する。
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &ChangesLogQuery) {
    builder.push("entity_type = ");
    builder.push_bind(query.entity_type.clone());

    if let Some(ref name) = query.property_name {
        builder.push(" AND property_name = ");
        builder.push_bind(name.clone());
    }
    match query.entity_id {
        Some(EntityId::Guid(id)) => {
            builder.push(" AND entity_id_guid = ");
            builder.push_bind(id);
        }
        Some(EntityId::Long(id)) => {
            builder.push(" AND entity_id_long = ");
            builder.push_bind(id);
        }
        None => {}
    }
    if let Some(from) = query.updated_from {
        builder.push(" AND updated_date >= ");
        builder.push_bind(from);
    }
    if let Some(before) = query.updated_before {
        builder.push(" AND updated_date < ");
        builder.push_bind(before);
    }
    if !query.search_words.is_empty() {
        builder.push(" AND (");
        for (i, word) in query.search_words.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            let escaped = escape_like(word);
            builder.push("old_value ILIKE ");
            builder.push_bind(format!("%{escaped}%"));
            builder.push(" OR new_value ILIKE ");
            builder.push_bind(format!("%{escaped}%"));
            builder.push(" OR user_id ILIKE ");
            builder.push_bind(format!("{escaped}%"));
        }
        builder.push(")");
    }
}

/// LIKE パターンのメタ文字をエスケープする。
pub(super) fn escape_like(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for ch in word.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// ChangesLogRow は DB から取得した行を表す中間構造体。
#[derive(Debug, sqlx::FromRow)]
struct ChangesLogRow {
    id: uuid::Uuid,
    entity_type: String,
    property_name: String,
    entity_id_guid: Option<uuid::Uuid>,
    entity_id_long: Option<i64>,
    old_value: Option<String>,
    new_value: Option<String>,
    updated_date: chrono::DateTime<chrono::Utc>,
    user_id: String,
}

impl TryFrom<ChangesLogRow> for ChangesLogEntry {
    type Error = anyhow::Error;

    fn try_from(row: ChangesLogRow) -> Result<Self, Self::Error> {
        let entity_id = match (row.entity_id_guid, row.entity_id_long) {
            (Some(guid), None) => EntityId::Guid(guid),
            (None, Some(long)) => EntityId::Long(long),
            _ => anyhow::bail!("changes_log row {} must have exactly one entity id", row.id),
        };
        Ok(ChangesLogEntry {
            id: row.id,
            entity_type: row.entity_type,
            property_name: row.property_name,
            entity_id,
            old_value: row.old_value,
            new_value: row.new_value,
            updated_date: row.updated_date,
            user_id: row.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(guid: Option<uuid::Uuid>, long: Option<i64>) -> ChangesLogRow {
        ChangesLogRow {
            id: uuid::Uuid::new_v4(),
            entity_type: "Provider".to_string(),
            property_name: "FullTitle".to_string(),
            entity_id_guid: guid,
            entity_id_long: long,
            old_value: None,
            new_value: Some("Sunny Kids".to_string()),
            updated_date: chrono::Utc::now(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_row_with_guid() {
        let guid = uuid::Uuid::new_v4();
        let entry = ChangesLogEntry::try_from(row(Some(guid), None)).unwrap();
        assert_eq!(entry.entity_id, EntityId::Guid(guid));
        assert!(entry.old_value.is_none());
    }

    #[test]
    fn test_row_with_long() {
        let entry = ChangesLogEntry::try_from(row(None, Some(9))).unwrap();
        assert_eq!(entry.entity_id, EntityId::Long(9));
    }

    #[test]
    fn test_row_with_both_ids_is_rejected() {
        assert!(ChangesLogEntry::try_from(row(Some(uuid::Uuid::new_v4()), Some(1))).is_err());
        assert!(ChangesLogEntry::try_from(row(None, None)).is_err());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_push_conditions_sql() {
        let mut query = ChangesLogQuery::for_entity_type("Provider");
        query.property_name = Some("FullTitle".to_string());
        query.entity_id = Some(EntityId::Long(3));
        query.search_words = vec!["a".to_string(), "b".to_string()];

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM changes_log WHERE ");
        push_conditions(&mut builder, &query);
        let sql = builder.sql();
        assert!(sql.contains("entity_type = $1"));
        assert!(sql.contains("property_name = $2"));
        assert!(sql.contains("entity_id_long = $3"));
        assert!(sql.contains("old_value ILIKE $4 OR new_value ILIKE $5 OR user_id ILIKE $6"));
        assert!(sql.contains(" OR old_value ILIKE $7"));
        assert!(sql.ends_with(')'));
    }
}
