//! Directory-backed backend: one JSON array file per tenant and table.
//!
//! Layout: `<base>/<tenant>/<table>.json`. Writes go through a temp file
//! and a rename so a crash never leaves a half-written table behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use roster_model::ItemId;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Result, SourceError};
use crate::session::TenantScope;
use crate::source::{DataSource, OrderBy, assign_id, merge_patch, row_id};

#[derive(Debug)]
pub struct JsonDirSource {
    base_dir: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl JsonDirSource {
    /// Open (and create if needed) a backend rooted at `base_dir`.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| SourceError::Io {
            operation: "create directory",
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn table_path(&self, scope: &TenantScope, table: &str) -> Result<PathBuf> {
        let tenant = scope.tenant().as_str();
        for part in [tenant, table] {
            if part.contains(['/', '\\']) || part.starts_with('.') {
                return Err(SourceError::Rejected(format!("invalid path segment: {part}")));
            }
        }
        Ok(self.base_dir.join(tenant).join(format!("{table}.json")))
    }

    async fn modify<R, F>(&self, scope: &TenantScope, table: &str, change: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Vec<Value>) -> Result<R> + Send + 'static,
    {
        let path = self.table_path(scope, table)?;
        let _guard = self.write_lock.lock().await;
        blocking(move || {
            let mut rows = read_table(&path)?;
            let result = change(&mut rows)?;
            write_table(&path, &rows)?;
            Ok(result)
        })
        .await
    }
}

async fn blocking<R, F>(work: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SourceError::Io {
            operation: "run background task for",
            path: PathBuf::new(),
            source: std::io::Error::other(e),
        })?
}

fn read_table(path: &Path) -> Result<Vec<Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(SourceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&contents).map_err(|source| SourceError::Decode {
        table: path.display().to_string(),
        source,
    })
}

fn write_table(path: &Path, rows: &[Value]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SourceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let bytes = serde_json::to_vec_pretty(rows).map_err(|source| SourceError::Decode {
        table: path.display().to_string(),
        source,
    })?;
    let temp_path = path.with_extension("json.tmp");
    let io_err = |operation: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source| SourceError::Io {
            operation,
            path,
            source,
        }
    };
    let mut file = File::create(&temp_path).map_err(io_err("create", &temp_path))?;
    file.write_all(&bytes).map_err(io_err("write", &temp_path))?;
    file.sync_all().map_err(io_err("sync", &temp_path))?;
    fs::rename(&temp_path, path).map_err(io_err("rename", path))?;
    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

impl DataSource for JsonDirSource {
    async fn query(
        &self,
        scope: &TenantScope,
        table: &str,
        order: Option<&OrderBy>,
    ) -> Result<Vec<Value>> {
        let path = self.table_path(scope, table)?;
        let mut rows = blocking(move || read_table(&path)).await?;
        if let Some(order) = order {
            order.apply(&mut rows);
        }
        Ok(rows)
    }

    async fn insert(&self, scope: &TenantScope, table: &str, row: Value) -> Result<Value> {
        let (id, row) = assign_id(row)?;
        let table_name = table.to_string();
        let stored = self
            .modify(scope, table, move |rows| {
                if rows.iter().any(|existing| row_id(existing) == Some(id.as_str())) {
                    return Err(SourceError::Conflict {
                        table: table_name,
                        id: id.to_string(),
                    });
                }
                rows.push(row.clone());
                Ok(row)
            })
            .await?;
        info!(table, tenant = %scope, "inserted row");
        Ok(stored)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        table: &str,
        id: &ItemId,
        patch: Value,
    ) -> Result<Value> {
        let id = id.clone();
        let table_name = table.to_string();
        self.modify(scope, table, move |rows| {
            let row = rows
                .iter_mut()
                .find(|row| row_id(row) == Some(id.as_str()))
                .ok_or_else(|| SourceError::not_found(&table_name, &id))?;
            merge_patch(row, patch)?;
            Ok(row.clone())
        })
        .await
    }

    async fn delete(&self, scope: &TenantScope, table: &str, id: &ItemId) -> Result<()> {
        let target = id.clone();
        let table_name = table.to_string();
        self.modify(scope, table, move |rows| {
            let before = rows.len();
            rows.retain(|row| row_id(row) != Some(target.as_str()));
            if rows.len() == before {
                return Err(SourceError::not_found(&table_name, &target));
            }
            Ok(())
        })
        .await?;
        info!(table, tenant = %scope, id = %id, "deleted row");
        Ok(())
    }
}
