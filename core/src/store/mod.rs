//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Engine components call store methods; they never execute SQL
//! directly. One submodule per record family.

mod od_request;
mod staff;
mod workload;

pub use od_request::OdRequestFilter;

use rusqlite::Connection;

use crate::error::AnalyticsResult;

pub struct OdStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for a file
}

impl OdStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> AnalyticsResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AnalyticsResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> AnalyticsResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalyticsResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }
}
