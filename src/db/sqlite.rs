//! SQLite-backed key-value store

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{init_db, run_migrations, try_lock, DbPool, KvStore};
use crate::error::Result;

#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  /// Open (or create) a database file and run migrations
  pub fn open(path: &Path) -> Result<Self> {
    Ok(Self {
      pool: init_db(path)?,
    })
  }

  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Self::from_pool(Arc::new(Mutex::new(conn))))
  }

  pub fn from_pool(pool: DbPool) -> Self {
    Self { pool }
  }
}

impl KvStore for SqliteStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = try_lock(&*self.pool, "database")?;
    let value = conn
      .query_row(
        "SELECT value FROM kv_entries WHERE key = ?1",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
    let mut conn = try_lock(&*self.pool, "database")?;
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        r#"
        INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
      )?;
      for (key, value) in entries {
        stmt.execute(params![key, value, now])?;
      }
    }
    tx.commit()?;
    Ok(())
  }
}
