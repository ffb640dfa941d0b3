use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::changes_log_postgres::ChangesLogPostgresRepository;
use super::operation_log_postgres::OperationLogPostgresRepository;
use crate::domain::entity::permissions_for_role::PermissionsForRole;
use crate::domain::repository::{DuplicateRoleName, PermissionsForRoleRepository};
use crate::domain::service::{AuditEntries, AuditTrail, Audited};

/// PermissionsForRolePostgresRepository は PermissionsForRoleRepository の PostgreSQL 実装。
pub struct PermissionsForRolePostgresRepository {
    pool: PgPool,
}

impl PermissionsForRolePostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionsForRoleRepository for PermissionsForRolePostgresRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<PermissionsForRole>> {
        let rows: Vec<PermissionsForRoleRow> = sqlx::query_as(
            "SELECT id, role_name, packed_permissions, description FROM permissions_for_role ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_role_name(
        &self,
        role_name: &str,
    ) -> anyhow::Result<Option<PermissionsForRole>> {
        let row: Option<PermissionsForRoleRow> = sqlx::query_as(
            "SELECT id, role_name, packed_permissions, description FROM permissions_for_role WHERE role_name = $1",
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<PermissionsForRole>> {
        let row: Option<PermissionsForRoleRow> = sqlx::query_as(
            "SELECT id, role_name, packed_permissions, description FROM permissions_for_role WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn create_with_audit(
        &self,
        record: &PermissionsForRole,
        audit: &AuditTrail,
    ) -> anyhow::Result<Audited<PermissionsForRole>> {
        let mut tx = self.pool.begin().await?;

        let row: PermissionsForRoleRow = sqlx::query_as(
            r#"
            INSERT INTO permissions_for_role (role_name, packed_permissions, description)
            VALUES ($1, $2, $3)
            RETURNING id, role_name, packed_permissions, description
            "#,
        )
        .bind(&record.role_name)
        .bind(&record.packed_permissions)
        .bind(&record.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, &record.role_name))?;
        let created = PermissionsForRole::from(row);

        let entries = audit.entries_for(None, &created)?;
        write_audit(&mut tx, &entries).await?;
        tx.commit().await?;

        Ok(Audited {
            record: created,
            changes_logged: entries.changes.len(),
        })
    }

    async fn update_with_audit(
        &self,
        record: &PermissionsForRole,
        audit: &AuditTrail,
    ) -> anyhow::Result<Option<Audited<PermissionsForRole>>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<PermissionsForRoleRow> = sqlx::query_as(
            "SELECT id, role_name, packed_permissions, description FROM permissions_for_role WHERE id = $1 FOR UPDATE",
        )
        .bind(record.id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current.map(PermissionsForRole::from) else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE permissions_for_role
            SET role_name = $2, packed_permissions = $3, description = $4
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.role_name)
        .bind(&record.packed_permissions)
        .bind(&record.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &record.role_name))?;

        let entries = audit.entries_for(Some(&current), record)?;
        write_audit(&mut tx, &entries).await?;
        tx.commit().await?;

        Ok(Some(Audited {
            record: record.clone(),
            changes_logged: entries.changes.len(),
        }))
    }
}

async fn write_audit(conn: &mut PgConnection, entries: &AuditEntries) -> anyhow::Result<()> {
    ChangesLogPostgresRepository::insert_entries(conn, &entries.changes).await?;
    OperationLogPostgresRepository::insert_entry(conn, &entries.operation).await
}

/// ロール名の一意制約違反は DuplicateRoleName として返す。
fn write_error(error: sqlx::Error, role_name: &str) -> anyhow::Error {
    match error {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DuplicateRoleName(role_name.to_string()).into()
        }
        other => other.into(),
    }
}

/// PermissionsForRoleRow は DB から取得した行を表す中間構造体。
#[derive(Debug, sqlx::FromRow)]
struct PermissionsForRoleRow {
    id: i64,
    role_name: String,
    packed_permissions: String,
    description: Option<String>,
}

impl From<PermissionsForRoleRow> for PermissionsForRole {
    fn from(row: PermissionsForRoleRow) -> Self {
        PermissionsForRole {
            id: row.id,
            role_name: row.role_name,
            packed_permissions: row.packed_permissions,
            description: row.description,
        }
    }
}
