//! Persisted job ledger
//!
//! SQLite copy of the in-memory history so records survive restarts.
//! Timestamps are stored as RFC 3339 text, method counts as a JSON object.
//! The connection sits behind a mutex so the ledger can be shared with the
//! async watch loop.

use anyhow::Result;
use chrono::{DateTime, Utc};
use frugal_core::OptimizationJob;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct JobDb {
    conn: Mutex<Connection>,
}

impl JobDb {
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                original_tokens INTEGER NOT NULL,
                optimized_tokens INTEGER NOT NULL,
                tokens_saved INTEGER NOT NULL,
                reduction_pct REAL NOT NULL,
                method_counts TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_jobs_task ON jobs(task_id);
            CREATE INDEX IF NOT EXISTS idx_jobs_timestamp ON jobs(timestamp);
            ",
        )?;
        Ok(())
    }

    pub fn insert(&self, job: &OptimizationJob) -> Result<()> {
        self.lock().execute(
            "INSERT INTO jobs (task_id, timestamp, original_tokens, optimized_tokens,
                               tokens_saved, reduction_pct, method_counts)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                job.task_id,
                job.timestamp.to_rfc3339(),
                job.original_tokens as i64,
                job.optimized_tokens as i64,
                job.tokens_saved as i64,
                job.reduction_pct,
                serde_json::to_string(&job.method_counts)?,
            ],
        )?;
        Ok(())
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<OptimizationJob>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT task_id, timestamp, original_tokens, optimized_tokens,
                    tokens_saved, reduction_pct, method_counts
             FROM jobs
             ORDER BY timestamp DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Self::row_to_job(row).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        e.to_string(),
                    )),
                )
            })
        })?;

        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(row?);
        }
        Ok(jobs)
    }

    pub fn total_tokens_saved(&self) -> Result<usize> {
        let total: i64 = self.lock().query_row(
            "SELECT COALESCE(SUM(tokens_saved), 0) FROM jobs",
            [],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as usize)
    }

    fn row_to_job(row: &Row) -> Result<OptimizationJob> {
        let timestamp: String = row.get(1)?;
        let method_counts: String = row.get(6)?;
        Ok(OptimizationJob {
            task_id: row.get(0)?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
            original_tokens: row.get::<_, i64>(2)? as usize,
            optimized_tokens: row.get::<_, i64>(3)? as usize,
            tokens_saved: row.get::<_, i64>(4)? as usize,
            reduction_pct: row.get(5)?,
            method_counts: serde_json::from_str(&method_counts)?,
        })
    }
}
