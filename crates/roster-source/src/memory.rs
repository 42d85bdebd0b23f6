//! In-memory backend with failure injection, used by tests and demos.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use roster_model::{ItemId, TenantId};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::session::TenantScope;
use crate::source::{DataSource, OrderBy, assign_id, merge_patch, row_id};

/// Failure to return from the next call instead of touching the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Network,
    Auth,
}

impl InjectedFailure {
    fn into_error(self) -> SourceError {
        match self {
            Self::Network => SourceError::Network("injected network failure".to_string()),
            Self::Auth => SourceError::Auth("injected session expiry".to_string()),
        }
    }
}

type TableKey = (TenantId, String);

/// Tenant-partitioned tables of JSON rows kept in insertion order.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: Mutex<HashMap<TableKey, Vec<Value>>>,
    failures: Mutex<VecDeque<InjectedFailure>>,
    queries: AtomicUsize,
    mutations: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a table's rows directly, bypassing failure injection.
    pub fn seed(&self, scope: &TenantScope, table: &str, rows: Vec<Value>) {
        lock(&self.tables).insert(key(scope, table), rows);
    }

    /// Queue a failure for the next call. Failures are consumed in order.
    pub fn fail_next(&self, failure: InjectedFailure) {
        lock(&self.failures).push_back(failure);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::Relaxed)
    }

    /// Rows currently stored, for assertions.
    pub fn rows(&self, scope: &TenantScope, table: &str) -> Vec<Value> {
        lock(&self.tables)
            .get(&key(scope, table))
            .cloned()
            .unwrap_or_default()
    }

    fn injected(&self) -> Result<()> {
        match lock(&self.failures).pop_front() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

fn key(scope: &TenantScope, table: &str) -> TableKey {
    (scope.tenant().clone(), table.to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DataSource for MemorySource {
    async fn query(
        &self,
        scope: &TenantScope,
        table: &str,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Value>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.injected()?;
        let mut rows = self.rows(scope, table);
        if let Some(order) = order {
            order.apply(&mut rows);
        }
        Ok(rows)
    }

    async fn insert(&self, scope: &TenantScope, table: &str, row: Value) -> Result<Value> {
        self.mutations.fetch_add(1, Ordering::Relaxed);
        self.injected()?;
        let (id, row) = assign_id(row)?;
        let mut tables = lock(&self.tables);
        let rows = tables.entry(key(scope, table)).or_default();
        if rows.iter().any(|existing| row_id(existing) == Some(id.as_str())) {
            return Err(SourceError::Conflict {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        rows.push(row.clone());
        debug!(table, id = %id, "inserted row");
        Ok(row)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        table: &str,
        id: &ItemId,
        patch: Value,
    ) -> Result<Value> {
        self.mutations.fetch_add(1, Ordering::Relaxed);
        self.injected()?;
        let mut tables = lock(&self.tables);
        let row = tables
            .get_mut(&key(scope, table))
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id.as_str())))
            .ok_or_else(|| SourceError::not_found(table, id))?;
        merge_patch(row, patch)?;
        Ok(row.clone())
    }

    async fn delete(&self, scope: &TenantScope, table: &str, id: &ItemId) -> Result<()> {
        self.mutations.fetch_add(1, Ordering::Relaxed);
        self.injected()?;
        let mut tables = lock(&self.tables);
        let rows = tables
            .get_mut(&key(scope, table))
            .ok_or_else(|| SourceError::not_found(table, id))?;
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id.as_str()));
        if rows.len() == before {
            return Err(SourceError::not_found(table, id));
        }
        debug!(table, id = %id, "deleted row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scope(tenant: &str) -> TenantScope {
        TenantScope::new(TenantId::new(tenant).unwrap())
    }

    #[tokio::test]
    async fn tables_are_partitioned_by_tenant() {
        let source = MemorySource::new();
        source
            .insert(&scope("acme"), "employees", json!({"id": "emp-1"}))
            .await
            .unwrap();
        assert_eq!(source.query(&scope("acme"), "employees", None).await.unwrap().len(), 1);
        assert!(source.query(&scope("globex"), "employees", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_once() {
        let source = MemorySource::new();
        source.fail_next(InjectedFailure::Network);
        let err = source.query(&scope("acme"), "employees", None).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(source.query(&scope("acme"), "employees", None).await.is_ok());
        assert_eq!(source.query_count(), 2);
    }

    #[tokio::test]
    async fn deleting_twice_is_a_not_found() {
        let source = MemorySource::new();
        let acme = scope("acme");
        source.seed(&acme, "employees", vec![json!({"id": "emp-1"})]);
        let id = ItemId::new("emp-1").unwrap();
        source.delete(&acme, "employees", &id).await.unwrap();
        let err = source.delete(&acme, "employees", &id).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let source = MemorySource::new();
        let acme = scope("acme");
        source.insert(&acme, "t", json!({"id": "x"})).await.unwrap();
        let err = source.insert(&acme, "t", json!({"id": "x"})).await.unwrap_err();
        assert!(matches!(err, SourceError::Conflict { .. }));
    }
}
