use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use marquee_db::SqliteStore;
use marquee_metadata::format::Locale;
use marquee_metadata::session::Session;
use sqlx::SqlitePool;

use crate::config::Config;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub session: Arc<Session>,
    pub rows: RowTracker,
}

impl AppState {
    pub fn new(db: SqlitePool, session: Session) -> Self {
        Self {
            db,
            session: Arc::new(session),
            rows: RowTracker::default(),
        }
    }
}

/// Connect to the database and apply migrations.
pub async fn open_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = marquee_db::connect(db_path).await?;
    marquee_db::migrate::run(&pool).await?;
    Ok(pool)
}

/// TMDB session over the `kv` table of `pool`.
pub fn build_session(pool: &SqlitePool, config: &Config) -> Session {
    let store = Arc::new(SqliteStore::new(pool.clone()));
    Session::tmdb(store, config.tmdb_base.clone())
        .with_language(config.language.clone())
        .with_locale(Locale::parse(&config.locale))
}

/// Rows whose lookup button is currently busy.
///
/// Only the same row is refused; two rows resolving to the same title still
/// race each other to the provider.
#[derive(Clone, Default)]
pub struct RowTracker {
    busy: Arc<Mutex<HashSet<String>>>,
}

impl RowTracker {
    /// Mark `row_id` busy. `None` if it already is.
    pub fn begin(&self, row_id: &str) -> Option<RowGuard> {
        let mut busy = self.busy.lock().unwrap_or_else(|e| e.into_inner());
        if !busy.insert(row_id.to_string()) {
            return None;
        }
        Some(RowGuard {
            busy: self.busy.clone(),
            row_id: row_id.to_string(),
        })
    }

    pub fn is_busy(&self, row_id: &str) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(row_id)
    }
}

/// Clears the busy mark when the lookup finishes, however it finishes.
pub struct RowGuard {
    busy: Arc<Mutex<HashSet<String>>>,
    row_id: String,
}

impl Drop for RowGuard {
    fn drop(&mut self) {
        self.busy
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.row_id);
    }
}
