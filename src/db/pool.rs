//! Async connection pool over deadpool-sqlite.
//!
//! Every statement runs through [`DatabasePool::interact`], which borrows a
//! pooled connection and executes the closure on tokio's blocking pool. File
//! databases get several WAL connections, so readers run alongside a writer
//! and concurrent writers wait on SQLite's own lock (`busy_timeout`) rather
//! than on a process-wide mutex.

use anyhow::{Context, Result};
use deadpool_sqlite::{Config, Hook, HookError, Pool, Runtime};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::memory::error::StorageError;

/// Connections kept for a file-backed database.
const FILE_POOL_SIZE: usize = 4;

pub struct DatabasePool {
    pool: Pool,
    path: Option<PathBuf>,
}

impl DatabasePool {
    /// Open (or create) the database at `path` with schema and migrations applied.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let pool = build_pool(path, FILE_POOL_SIZE, file_post_create_hook())
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        let db = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        db.prepare().await?;

        tracing::info!(path = %path.display(), "database initialized");
        Ok(db)
    }

    /// A private in-memory database.
    ///
    /// Uses a shared-cache URI so pooled connections see the same data. The
    /// pool holds a single connection: shared-cache writers report
    /// `SQLITE_LOCKED` instead of waiting on `busy_timeout`.
    pub async fn open_in_memory() -> Result<Self> {
        let uri = format!("file:aura_{}?mode=memory&cache=shared", uuid::Uuid::now_v7());
        let pool = build_pool(Path::new(&uri), 1, memory_post_create_hook())
            .context("failed to open in-memory database")?;
        let db = Self { pool, path: None };
        db.prepare().await?;
        Ok(db)
    }

    /// Database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` on a pooled connection on the blocking pool.
    pub async fn interact<F, R, E>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Connection) -> std::result::Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<StorageError> + Send + 'static,
    {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StorageError::Pool(format!("failed to get connection: {e}")))?;
        conn.interact(f)
            .await
            .map_err(|e| StorageError::Pool(format!("interact failed: {e}")))?
    }

    async fn prepare(&self) -> Result<()> {
        self.interact(|conn| super::prepare_schema(conn).map_err(StorageError::from))
            .await
            .context("failed to initialize schema")
    }
}

fn build_pool(path: &Path, max_size: usize, hook: Hook) -> Result<Pool> {
    let pool = Config::new(path)
        .builder(Runtime::Tokio1)
        .context("failed to create pool builder")?
        .max_size(max_size)
        .post_create(hook)
        .build()
        .context("failed to build connection pool")?;
    Ok(pool)
}

fn file_post_create_hook() -> Hook {
    Hook::async_fn(|conn, _metrics| {
        Box::pin(async move {
            conn.interact(|conn| super::setup_connection(conn))
                .await
                .map_err(|e| HookError::Message(format!("interact failed: {e}").into()))?
                .map_err(|e| HookError::Message(format!("connection setup failed: {e}").into()))
        })
    })
}

fn memory_post_create_hook() -> Hook {
    Hook::async_fn(|conn, _metrics| {
        Box::pin(async move {
            conn.interact(|conn| conn.busy_timeout(std::time::Duration::from_millis(5000)))
                .await
                .map_err(|e| HookError::Message(format!("interact failed: {e}").into()))?
                .map_err(|e| HookError::Message(format!("connection setup failed: {e}").into()))
        })
    })
}
