//! インメモリリポジトリ。
//! データベース未設定時の起動と統合テスト（tests/integration_test.rs）で利用する。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entity::changes_log::{ChangesLogEntry, ChangesLogQuery, MAX_VALUE_LENGTH};
use crate::domain::entity::operation_log::{OperationLogEntry, OperationLogQuery};
use crate::domain::entity::permissions_for_role::PermissionsForRole;
use crate::domain::repository::{
    ChangesLogRepository, DuplicateRoleName, OperationLogRepository, PermissionsForRoleRepository,
};
use crate::domain::service::{AuditEntries, AuditTrail, Audited};

// マイグレーションの VARCHAR 長と揃える
const MAX_NAME_LENGTH: usize = 128;

// ---------------------------------------------------------------------------
// InMemoryAuditLogRepository
// ---------------------------------------------------------------------------

#[derive(Default)]
struct AuditLogState {
    changes: Vec<ChangesLogEntry>,
    operations: Vec<OperationLogEntry>,
}

/// 変更ログと操作ログをまとめて保持するインメモリ実装。
/// ChangesLogRepository と OperationLogRepository の両方を実装する。
#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    state: RwLock<AuditLogState>,
}

impl InMemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(changes: Vec<ChangesLogEntry>) -> Self {
        Self {
            state: RwLock::new(AuditLogState {
                changes,
                operations: vec![],
            }),
        }
    }

    /// 変更ログと操作ログを一括で追記する。1 件でも制約に反すれば何も書かない。
    pub async fn append_all(&self, entries: &AuditEntries) -> anyhow::Result<()> {
        for change in &entries.changes {
            check_change(change)?;
        }
        check_operation(&entries.operation)?;

        let mut state = self.state.write().await;
        state.changes.extend_from_slice(&entries.changes);
        state.operations.push(entries.operation.clone());
        Ok(())
    }
}

fn check_length(column: &str, value: &str, max: usize) -> anyhow::Result<()> {
    if value.chars().count() > max {
        anyhow::bail!("value too long for column {column} (max {max} characters)");
    }
    Ok(())
}

fn check_change(entry: &ChangesLogEntry) -> anyhow::Result<()> {
    check_length("entity_type", &entry.entity_type, MAX_NAME_LENGTH)?;
    check_length("property_name", &entry.property_name, MAX_NAME_LENGTH)?;
    check_length("user_id", &entry.user_id, MAX_NAME_LENGTH)?;
    if let Some(ref value) = entry.old_value {
        check_length("old_value", value, MAX_VALUE_LENGTH)?;
    }
    if let Some(ref value) = entry.new_value {
        check_length("new_value", value, MAX_VALUE_LENGTH)?;
    }
    Ok(())
}

fn check_operation(entry: &OperationLogEntry) -> anyhow::Result<()> {
    check_length("entity_type", &entry.entity_type, MAX_NAME_LENGTH)?;
    check_length("user_id", &entry.user_id, MAX_NAME_LENGTH)
}

/// 新しい順に並べて (1 ページ, 総件数) を返す。
fn page<T: Clone>(matched: Vec<&T>, offset: i64, limit: i64) -> anyhow::Result<(Vec<T>, i64)> {
    let total = i64::try_from(matched.len())?;
    let offset = usize::try_from(offset)?;
    let limit = usize::try_from(limit)?;
    let page = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    Ok((page, total))
}

#[async_trait]
impl ChangesLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entries: &[ChangesLogEntry]) -> anyhow::Result<()> {
        for entry in entries {
            check_change(entry)?;
        }
        self.state.write().await.changes.extend_from_slice(entries);
        Ok(())
    }

    async fn search(
        &self,
        query: &ChangesLogQuery,
    ) -> anyhow::Result<(Vec<ChangesLogEntry>, i64)> {
        let state = self.state.read().await;
        let mut matched: Vec<&ChangesLogEntry> =
            state.changes.iter().filter(|e| query.matches(e)).collect();
        matched.sort_by(|a, b| b.updated_date.cmp(&a.updated_date).then(a.id.cmp(&b.id)));
        page(matched, query.offset, query.limit)
    }
}

#[async_trait]
impl OperationLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entry: &OperationLogEntry) -> anyhow::Result<()> {
        check_operation(entry)?;
        self.state.write().await.operations.push(entry.clone());
        Ok(())
    }

    async fn search(
        &self,
        query: &OperationLogQuery,
    ) -> anyhow::Result<(Vec<OperationLogEntry>, i64)> {
        let state = self.state.read().await;
        let mut matched: Vec<&OperationLogEntry> =
            state.operations.iter().filter(|e| query.matches(e)).collect();
        matched.sort_by(|a, b| {
            b.operation_date
                .cmp(&a.operation_date)
                .then(a.id.cmp(&b.id))
        });
        page(matched, query.offset, query.limit)
    }
}

// ---------------------------------------------------------------------------
// InMemoryPermissionsForRoleRepository
// ---------------------------------------------------------------------------

/// インメモリ PermissionsForRoleRepository 実装。
///
/// 書き込みはロールの書き込みロックを保持したまま監査ログを先に追記し、
/// 成功した場合だけレコードを反映する。
pub struct InMemoryPermissionsForRoleRepository {
    records: RwLock<Vec<PermissionsForRole>>,
    audit_log: Arc<InMemoryAuditLogRepository>,
}

impl InMemoryPermissionsForRoleRepository {
    pub fn new(audit_log: Arc<InMemoryAuditLogRepository>) -> Self {
        Self::with_records(vec![], audit_log)
    }

    pub fn with_records(
        records: Vec<PermissionsForRole>,
        audit_log: Arc<InMemoryAuditLogRepository>,
    ) -> Self {
        Self {
            records: RwLock::new(records),
            audit_log,
        }
    }
}

#[async_trait]
impl PermissionsForRoleRepository for InMemoryPermissionsForRoleRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<PermissionsForRole>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_role_name(
        &self,
        role_name: &str,
    ) -> anyhow::Result<Option<PermissionsForRole>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.role_name == role_name).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<PermissionsForRole>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn create_with_audit(
        &self,
        record: &PermissionsForRole,
        audit: &AuditTrail,
    ) -> anyhow::Result<Audited<PermissionsForRole>> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.role_name == record.role_name) {
            return Err(DuplicateRoleName(record.role_name.clone()).into());
        }
        let mut created = record.clone();
        created.id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let entries = audit.entries_for(None, &created)?;
        self.audit_log.append_all(&entries).await?;
        records.push(created.clone());

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
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.role_name == record.role_name && r.id != record.id)
        {
            return Err(DuplicateRoleName(record.role_name.clone()).into());
        }
        let Some(index) = records.iter().position(|r| r.id == record.id) else {
            return Ok(None);
        };

        let entries = audit.entries_for(Some(&records[index]), record)?;
        self.audit_log.append_all(&entries).await?;
        records[index] = record.clone();

        Ok(Some(Audited {
            record: record.clone(),
            changes_logged: entries.changes.len(),
        }))
    }
}
