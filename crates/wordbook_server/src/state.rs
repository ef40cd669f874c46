//! Shared request state.
//!
//! # Responsibility
//! - Own the single store connection opened at startup.
//! - Run one service call per request on the blocking pool.
//!
//! # Invariants
//! - Each service call holds the connection lock for its whole
//!   load-mutate-save cycle, so requests inside one process never interleave.

use crate::error::ApiError;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use wordbook_core::{
    Clock, ServiceResult, SqliteWordRepository, SystemClock, WordOrder, WordService,
};

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    default_order: WordOrder,
}

impl AppState {
    /// Wraps a migrated connection, stamping times from the system clock.
    pub fn new(conn: Connection, default_order: WordOrder) -> Self {
        Self::with_clock(conn, default_order, Arc::new(SystemClock))
    }

    pub fn with_clock(conn: Connection, default_order: WordOrder, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            clock,
            default_order,
        }
    }

    /// Returns the shared connection so the owner can close it at shutdown.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.db)
    }

    pub fn default_order(&self) -> WordOrder {
        self.default_order
    }

    /// Runs `op` against a fresh service over the locked connection.
    pub async fn with_word_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&WordService<SqliteWordRepository<'_>>) -> ServiceResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let clock = Arc::clone(&self.clock);

        let outcome = tokio::task::spawn_blocking(move || {
            let conn = db.lock();
            let repo = SqliteWordRepository::try_new(&conn)?;
            let service = WordService::with_clock(repo, clock);
            op(&service)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("word service task failed: {err}")))?;

        outcome.map_err(ApiError::from)
    }
}
