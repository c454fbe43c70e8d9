use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::masters::{MasterItem, MasterKind, MasterList};
use crate::session::{SessionRecord, SessionStatus};
use crate::target::{TargetEntry, TargetHistory};
use crate::util;

pub type Result<T> = std::result::Result<T, StoreError>;

const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    started_at TEXT NOT NULL,
    ended_at TEXT NOT NULL,
    status TEXT NOT NULL,
    planned_total_seconds INTEGER NOT NULL,
    planned_study_seconds INTEGER NOT NULL,
    planned_break_seconds INTEGER NOT NULL,
    active_study_seconds INTEGER NOT NULL,
    active_break_seconds INTEGER NOT NULL,
    total_active_seconds INTEGER NOT NULL,
    paused_total_seconds INTEGER NOT NULL,
    topic TEXT NOT NULL,
    mode TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);

CREATE TABLE IF NOT EXISTS target_history (
    date_key TEXT PRIMARY KEY,
    target_seconds INTEGER NOT NULL,
    saved_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS masters (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_masters_kind ON masters(kind);
"#;

/// SQLite-backed storage for the session log, target history and master lists
#[derive(Debug)]
pub struct StudyDb {
    conn: Connection,
    path: Option<PathBuf>,
}

impl StudyDb {
    /// Open (and create if needed) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        let db = StudyDb {
            conn,
            path: Some(path),
        };
        db.migrate()?;
        info!("opened study database at {}", db.path_display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = StudyDb {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn path_display(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }

    fn migrate(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            warn!("database schema v{version} is newer than supported v{SCHEMA_VERSION}");
        }
        self.conn.execute_batch(SCHEMA)?;
        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    // ---- session log ----

    pub fn append_session(&self, record: &SessionRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (id, started_at, ended_at, status, planned_total_seconds, planned_study_seconds,
             planned_break_seconds, active_study_seconds, active_break_seconds,
             total_active_seconds, paused_total_seconds, topic, mode)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                record.id,
                record.started_at.to_rfc3339(),
                record.ended_at.to_rfc3339(),
                record.status.to_string(),
                record.planned_total_seconds,
                record.planned_study_seconds,
                record.planned_break_seconds,
                record.active_study_seconds,
                record.active_break_seconds,
                record.total_active_seconds,
                record.paused_total_seconds,
                record.topic,
                record.mode,
            ],
        )?;
        info!(
            "saved {} session {} ({}s active)",
            record.status, record.id, record.total_active_seconds
        );
        Ok(())
    }

    /// All sessions, most recently saved first
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, started_at, ended_at, status, planned_total_seconds, planned_study_seconds,
                   planned_break_seconds, active_study_seconds, active_break_seconds,
                   total_active_seconds, paused_total_seconds, topic, mode
            FROM sessions
            ORDER BY seq DESC
            "#,
        )?;

        let rows = stmt.query_map([], RawSession::from_row)?;
        let mut sessions = Vec::new();
        for raw in rows {
            sessions.push(raw?.into_record()?);
        }
        Ok(sessions)
    }

    pub fn session_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn clear_sessions(&self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM sessions", [])?;
        info!("cleared {removed} sessions");
        Ok(())
    }

    // ---- target history ----

    pub fn target_history(&self) -> Result<TargetHistory> {
        let mut stmt = self.conn.prepare(
            "SELECT date_key, target_seconds, saved_at FROM target_history ORDER BY date_key ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date_key, target_seconds, saved_at) = row?;
            entries.push(TargetEntry {
                date_key: parse_date(&date_key)?,
                target_seconds,
                saved_at: parse_datetime(&saved_at, "saved_at")?,
            });
        }
        Ok(TargetHistory::from_entries(entries))
    }

    /// Insert or overwrite the entry for the entry's date
    pub fn upsert_target(&self, entry: &TargetEntry) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO target_history (date_key, target_seconds, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(date_key) DO UPDATE SET
                target_seconds = excluded.target_seconds,
                saved_at = excluded.saved_at
            "#,
            params![
                util::format_date_key(entry.date_key),
                entry.target_seconds,
                entry.saved_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn clear_target_history(&self) -> Result<()> {
        self.conn.execute("DELETE FROM target_history", [])?;
        info!("target history cleared");
        Ok(())
    }

    // ---- master lists ----

    pub fn master_list(&self, kind: MasterKind) -> Result<MasterList> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, active, created_at FROM masters WHERE kind = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([kind.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, name, active, created_at) = row?;
            items.push(MasterItem {
                id,
                name,
                active,
                created_at: parse_datetime(&created_at, "created_at")?,
            });
        }
        Ok(MasterList::from_items(items))
    }

    pub fn insert_master_item(&self, kind: MasterKind, item: &MasterItem) -> Result<()> {
        self.conn.execute(
            "INSERT INTO masters (id, kind, name, active, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.id,
                kind.to_string(),
                item.name,
                item.active,
                item.created_at.to_rfc3339(),
            ],
        )?;
        info!("added {kind} '{}'", item.name);
        Ok(())
    }

    pub fn set_master_active(&self, id: &str, active: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE masters SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(())
    }
}

struct RawSession {
    id: String,
    started_at: String,
    ended_at: String,
    status: String,
    counts: [u32; 7],
    topic: String,
    mode: String,
}

impl RawSession {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            started_at: row.get(1)?,
            ended_at: row.get(2)?,
            status: row.get(3)?,
            counts: [
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
            ],
            topic: row.get(11)?,
            mode: row.get(12)?,
        })
    }

    fn into_record(self) -> Result<SessionRecord> {
        let status = SessionStatus::parse(&self.status).ok_or_else(|| StoreError::Corrupt {
            column: "status",
            value: self.status.clone(),
        })?;
        let [planned_total, planned_study, planned_break, active_study, active_break, total_active, paused] =
            self.counts;
        Ok(SessionRecord {
            id: self.id,
            started_at: parse_datetime(&self.started_at, "started_at")?,
            ended_at: parse_datetime(&self.ended_at, "ended_at")?,
            status,
            planned_total_seconds: planned_total,
            planned_study_seconds: planned_study,
            planned_break_seconds: planned_break,
            active_study_seconds: active_study,
            active_break_seconds: active_break,
            total_active_seconds: total_active,
            paused_total_seconds: paused,
            topic: self.topic,
            mode: self.mode,
        })
    }
}

fn parse_datetime(value: &str, column: &'static str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    util::parse_date_key(value).ok_or_else(|| StoreError::Corrupt {
        column: "date_key",
        value: value.to_string(),
    })
}
