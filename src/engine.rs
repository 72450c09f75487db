//! Database session for the policy tracker.
//!
//! A `PolicyDb` wraps exactly one PostgreSQL connection. The binary opens it
//! once per invocation and hands it to the command being run; `close` must be
//! called on every exit path after a successful `connect`.

use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{ConnectOptions, Connection, Executor, Row};
use tracing::debug;

use crate::config::ConnectTarget;
use crate::error::{TrackerError, TrackerResult};
use crate::model::{ListRow, PolicyChange, ReportRow, UpcomingRow};

/// An open session against the tracker database.
pub struct PolicyDb {
    conn: PgConnection,
}

impl PolicyDb {
    /// Open a session.
    ///
    /// ```rust,ignore
    /// let target = ConnectTarget::Url("postgres://localhost/policies".into());
    /// let mut db = PolicyDb::connect(&target).await?;
    /// ```
    pub async fn connect(target: &ConnectTarget) -> TrackerResult<Self> {
        let options = target.options()?;
        debug!(db = %target, "opening database session");

        let conn = options
            .connect()
            .await
            .map_err(|e| TrackerError::Connection(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Close the session, consuming it.
    pub async fn close(self) -> TrackerResult<()> {
        debug!("closing database session");
        self.conn
            .close()
            .await
            .map_err(|e| TrackerError::Connection(e.to_string()))
    }

    /// Run a statement that returns no rows. Returns the affected row count.
    ///
    /// The text may hold several `;`-separated statements.
    pub async fn execute(&mut self, sql: &str) -> TrackerResult<u64> {
        debug!(sql, "execute");
        let result = self.conn.execute(sql).await.map_err(execution)?;
        debug!(rows = result.rows_affected(), "statement complete");
        Ok(result.rows_affected())
    }

    /// Fetch at most one full policy change.
    pub async fn fetch_policy_change(&mut self, sql: &str) -> TrackerResult<Option<PolicyChange>> {
        debug!(sql, "fetch_optional");
        let row = self.conn.fetch_optional(sql).await.map_err(execution)?;
        row.as_ref().map(policy_change_from_row).transpose()
    }

    /// Fetch full policy changes.
    pub async fn fetch_policy_changes(&mut self, sql: &str) -> TrackerResult<Vec<PolicyChange>> {
        self.fetch_rows(sql)
            .await?
            .iter()
            .map(policy_change_from_row)
            .collect()
    }

    /// Fetch `list` summary rows.
    pub async fn fetch_list_rows(&mut self, sql: &str) -> TrackerResult<Vec<ListRow>> {
        self.fetch_rows(sql)
            .await?
            .iter()
            .map(|row| -> TrackerResult<ListRow> {
                Ok(ListRow {
                    id: get(row, "id")?,
                    effective_date: get(row, "effective_date")?,
                    category: get(row, "category")?,
                    impact_level: get(row, "impact_level")?,
                    title: get(row, "title")?,
                    owner: get(row, "owner")?,
                })
            })
            .collect()
    }

    /// Fetch `upcoming` rows.
    pub async fn fetch_upcoming_rows(&mut self, sql: &str) -> TrackerResult<Vec<UpcomingRow>> {
        self.fetch_rows(sql)
            .await?
            .iter()
            .map(|row| -> TrackerResult<UpcomingRow> {
                Ok(UpcomingRow {
                    id: get(row, "id")?,
                    effective_date: get(row, "effective_date")?,
                    days_until: get(row, "days_until")?,
                    category: get(row, "category")?,
                    impact_level: get(row, "impact_level")?,
                    title: get(row, "title")?,
                    owner: get(row, "owner")?,
                })
            })
            .collect()
    }

    /// Fetch `report` rows. The grouping value is column 0, the count column 1.
    pub async fn fetch_report_rows(&mut self, sql: &str) -> TrackerResult<Vec<ReportRow>> {
        self.fetch_rows(sql)
            .await?
            .iter()
            .map(|row| -> TrackerResult<ReportRow> {
                Ok(ReportRow {
                    key: get(row, 0usize)?,
                    count: get(row, 1usize)?,
                })
            })
            .collect()
    }

    async fn fetch_rows(&mut self, sql: &str) -> TrackerResult<Vec<PgRow>> {
        debug!(sql, "fetch_all");
        let rows = self.conn.fetch_all(sql).await.map_err(execution)?;
        debug!(rows = rows.len(), "rows fetched");
        Ok(rows)
    }
}

fn execution(e: sqlx::Error) -> TrackerError {
    match e {
        sqlx::Error::Database(db) => TrackerError::Execution(db.message().to_string()),
        other => TrackerError::Execution(other.to_string()),
    }
}

fn get<'r, T, I>(row: &'r PgRow, index: I) -> TrackerResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    I: sqlx::ColumnIndex<PgRow> + std::fmt::Display + Copy,
{
    row.try_get(index)
        .map_err(|e| TrackerError::Decode(format!("{index}: {e}")))
}

fn policy_change_from_row(row: &PgRow) -> TrackerResult<PolicyChange> {
    Ok(PolicyChange {
        id: get(row, "id")?,
        title: get(row, "title")?,
        category: get(row, "category")?,
        impact_level: get(row, "impact_level")?,
        effective_date: get(row, "effective_date")?,
        owner: get(row, "owner")?,
        notes: get(row, "notes")?,
        created_at: get(row, "created_at")?,
    })
}
