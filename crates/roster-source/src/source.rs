//! The remote table capability and typed record helpers.
//!
//! Rows travel as JSON objects, the way the hosted backend's client hands
//! them over. Whole tables are fetched per tenant and filtered client-side;
//! there is no predicate pushdown.

use std::cmp::Ordering;
use std::future::Future;

use roster_model::{ItemId, Record};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::session::TenantScope;

/// Server-side ordering of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Sort rows in place. Rows missing the column sort last in both directions.
    pub fn apply(&self, rows: &mut [Value]) {
        rows.sort_by(|a, b| {
            match (a.get(&self.column), b.get(&self.column)) {
                (Some(a), Some(b)) if !a.is_null() && !b.is_null() => {
                    let ord = compare_json(a, b);
                    if self.descending { ord.reverse() } else { ord }
                }
                (Some(a), _) if !a.is_null() => Ordering::Less,
                (_, Some(b)) if !b.is_null() => Ordering::Greater,
                _ => Ordering::Equal,
            }
        });
    }
}

fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// A tenant-partitioned table store.
///
/// Each call is one opaque round trip: no batching, no transactions.
pub trait DataSource {
    fn query(
        &self,
        scope: &TenantScope,
        table: &str,
        order: Option<&OrderBy>,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Insert a row and return it as stored. Rows without an `id` get one.
    fn insert(
        &self,
        scope: &TenantScope,
        table: &str,
        row: Value,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Shallow-merge `patch` into the row and return the result.
    fn update(
        &self,
        scope: &TenantScope,
        table: &str,
        id: &ItemId,
        patch: Value,
    ) -> impl Future<Output = Result<Value>> + Send;

    fn delete(
        &self,
        scope: &TenantScope,
        table: &str,
        id: &ItemId,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Ensure `row` carries a non-blank `id`, generating one if needed.
pub(crate) fn assign_id(mut row: Value) -> Result<(ItemId, Value)> {
    let Value::Object(map) = &mut row else {
        return Err(SourceError::Rejected("row must be a JSON object".to_string()));
    };
    let existing = map
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| ItemId::new(id).ok());
    let id = existing.unwrap_or_else(ItemId::generate);
    map.insert("id".to_string(), Value::String(id.to_string()));
    Ok((id, row))
}

/// Shallow merge of a JSON object patch. The `id` field is never overwritten.
pub(crate) fn merge_patch(row: &mut Value, patch: Value) -> Result<()> {
    let (Value::Object(target), Value::Object(changes)) = (row, patch) else {
        return Err(SourceError::Rejected("patch must be a JSON object".to_string()));
    };
    for (key, value) in changes {
        if key != "id" {
            target.insert(key, value);
        }
    }
    Ok(())
}

pub(crate) fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

/// Fetch every row of `T`'s table for the tenant.
pub async fn fetch_records<T, S>(source: &S, scope: &TenantScope, order: Option<&OrderBy>) -> Result<Vec<T>>
where
    T: Record,
    S: DataSource + ?Sized,
{
    let rows = source.query(scope, T::TABLE, order).await?;
    debug!(table = T::TABLE, tenant = %scope, rows = rows.len(), "fetched rows");
    rows.into_iter().map(decode::<T>).collect()
}

pub async fn insert_record<T, S>(source: &S, scope: &TenantScope, record: &T) -> Result<T>
where
    T: Record,
    S: DataSource + ?Sized,
{
    let row = serde_json::to_value(record).map_err(|source| SourceError::Decode {
        table: T::TABLE.to_string(),
        source,
    })?;
    let stored = source.insert(scope, T::TABLE, row).await?;
    decode(stored)
}

pub async fn update_record<T, S>(
    source: &S,
    scope: &TenantScope,
    id: &ItemId,
    patch: Value,
) -> Result<T>
where
    T: Record,
    S: DataSource + ?Sized,
{
    let stored = source.update(scope, T::TABLE, id, patch).await?;
    decode(stored)
}

pub async fn delete_record<T, S>(source: &S, scope: &TenantScope, id: &ItemId) -> Result<()>
where
    T: Record,
    S: DataSource + ?Sized,
{
    source.delete(scope, T::TABLE, id).await
}

fn decode<T: Record>(row: Value) -> Result<T> {
    serde_json::from_value(row).map_err(|source| SourceError::Decode {
        table: T::TABLE.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_by_puts_missing_values_last() {
        let mut rows = vec![
            json!({"id": "a", "n": 2}),
            json!({"id": "b"}),
            json!({"id": "c", "n": 10}),
            json!({"id": "d", "n": null}),
        ];
        OrderBy::desc("n").apply(&mut rows);
        let ids: Vec<&str> = rows.iter().filter_map(row_id).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn assign_id_keeps_existing_and_fills_blank() {
        let (id, row) = assign_id(json!({"id": "emp-1"})).unwrap();
        assert_eq!(id.as_str(), "emp-1");
        assert_eq!(row["id"], "emp-1");

        let (id, row) = assign_id(json!({"id": "  ", "name": "x"})).unwrap();
        assert!(!id.as_str().trim().is_empty());
        assert_eq!(row["id"], id.as_str());

        assert!(assign_id(json!([1, 2])).is_err());
    }

    #[test]
    fn merge_patch_never_changes_id() {
        let mut row = json!({"id": "emp-1", "status": "active"});
        merge_patch(&mut row, json!({"id": "other", "status": "terminated"})).unwrap();
        assert_eq!(row, json!({"id": "emp-1", "status": "terminated"}));
    }
}
