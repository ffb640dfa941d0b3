use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::changes_log_postgres::escape_like;
use crate::domain::entity::changes_log::EntityId;
use crate::domain::entity::operation_log::{OperationLogEntry, OperationLogQuery, OperationType};
use crate::domain::repository::OperationLogRepository;

/// OperationLogPostgresRepository は OperationLogRepository の PostgreSQL 実装。
pub struct OperationLogPostgresRepository {
    pool: PgPool,
}

impl OperationLogPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 呼び出し側のトランザクション内で操作ログを 1 件書き込む。
    pub async fn insert_entry(
        conn: &mut PgConnection,
        entry: &OperationLogEntry,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO operation_log
                (id, entity_type, entity_id_guid, entity_id_long, operation_type, operation_date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.entity_type)
        .bind(entry.entity_id.as_guid())
        .bind(entry.entity_id.as_long())
        .bind(entry.operation_type.as_str())
        .bind(entry.operation_date)
        .bind(&entry.user_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl OperationLogRepository for OperationLogPostgresRepository {
    async fn append(&self, entry: &OperationLogEntry) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_entry(&mut conn, entry).await
    }

    async fn search(
        &self,
        query: &OperationLogQuery,
    ) -> anyhow::Result<(Vec<OperationLogEntry>, i64)> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM operation_log WHERE TRUE");
        push_conditions(&mut count_builder, query);
        let total_count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut data_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, entity_type, entity_id_guid, entity_id_long, operation_type, operation_date, user_id FROM operation_log WHERE TRUE",
        );
        push_conditions(&mut data_builder, query);
        data_builder.push(" ORDER BY operation_date DESC, id LIMIT ");
        data_builder.push_bind(query.limit);
        data_builder.push(" OFFSET ");
        data_builder.push_bind(query.offset);

        let rows: Vec<OperationLogRow> = data_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;
        let entries = rows
            .into_iter()
            .map(OperationLogEntry::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok((entries, total_count))
    }
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &OperationLogQuery) {
    if let Some(ref entity_type) = query.entity_type {
        builder.push(" AND entity_type = ");
        builder.push_bind(entity_type.clone());
    }
    if let Some(operation_type) = query.operation_type {
        builder.push(" AND operation_type = ");
        builder.push_bind(operation_type.as_str());
    }
    if let Some(from) = query.operated_from {
        builder.push(" AND operation_date >= ");
        builder.push_bind(from);
    }
    if let Some(before) = query.operated_before {
        builder.push(" AND operation_date < ");
        builder.push_bind(before);
    }
    if !query.search_words.is_empty() {
        builder.push(" AND (");
        for (i, word) in query.search_words.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push("user_id ILIKE ");
            builder.push_bind(format!("{}%", escape_like(word)));
        }
        builder.push(")");
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OperationLogRow {
    id: uuid::Uuid,
    entity_type: String,
    entity_id_guid: Option<uuid::Uuid>,
    entity_id_long: Option<i64>,
    operation_type: String,
    operation_date: chrono::DateTime<chrono::Utc>,
    user_id: String,
}

impl TryFrom<OperationLogRow> for OperationLogEntry {
    type Error = anyhow::Error;

    fn try_from(row: OperationLogRow) -> Result<Self, Self::Error> {
        let entity_id = match (row.entity_id_guid, row.entity_id_long) {
            (Some(guid), None) => EntityId::Guid(guid),
            (None, Some(long)) => EntityId::Long(long),
            _ => anyhow::bail!("operation_log row {} must have exactly one entity id", row.id),
        };
        let operation_type = row
            .operation_type
            .parse::<OperationType>()
            .map_err(anyhow::Error::msg)?;
        Ok(OperationLogEntry {
            id: row.id,
            entity_type: row.entity_type,
            entity_id,
            operation_type,
            operation_date: row.operation_date,
            user_id: row.user_id,
        })
    }
}
