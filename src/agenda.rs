use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use tracing::{debug, error};

/// Maximum length of an agenda description
pub const MAX_DESCRIPTION_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AgendaItem {
    pub id: i64,
    pub datetime: NaiveDateTime,
    pub all_day: bool,
    pub description: String,
}

/// An agenda item that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgendaItem {
    pub datetime: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum AgendaError {
    /// A filter value could not be interpreted as an item id
    #[error("Agenda item id should be an integer, not '{0}'")]
    FilterNotValid(String),

    #[error("Invalid agenda item: {0}")]
    InvalidItem(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type AgendaResult<T> = Result<T, AgendaError>;

/// Parse an untyped id filter, e.g. from a query string.
pub fn parse_filter_id(raw: &str) -> AgendaResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        error!(filter = raw, "agenda id filter is not an integer");
        AgendaError::FilterNotValid(raw.to_string())
    })
}

#[derive(Clone)]
pub struct AgendaStore {
    pool: SqlitePool,
}

impl AgendaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `agenda` table and its index if they do not exist.
    pub async fn create_tables(&self) -> sqlx::Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS agenda (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            datetime TEXT NOT NULL,
            all_day INTEGER NOT NULL DEFAULT 0,
            description TEXT NOT NULL
        )"#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_agenda_datetime ON agenda(datetime)"#)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_item(&self, item: &NewAgendaItem) -> AgendaResult<AgendaItem> {
        let description = item.description.trim();
        if description.is_empty() {
            return Err(AgendaError::InvalidItem("description is empty".into()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AgendaError::InvalidItem(format!(
                "description longer than {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        // Use a single connection so last_insert_rowid() is correct for the just-executed INSERT
        let mut conn = self.pool.acquire().await?;
        sqlx::query("INSERT INTO agenda (datetime, all_day, description) VALUES (?1, ?2, ?3)")
            .bind(item.datetime)
            .bind(item.all_day)
            .bind(description)
            .execute(&mut *conn)
            .await?;
        let id: i64 = sqlx::query_scalar("SELECT last_insert_rowid()")
            .fetch_one(&mut *conn)
            .await?;
        debug!(id, "agenda item stored");

        Ok(AgendaItem {
            id,
            datetime: item.datetime,
            all_day: item.all_day,
            description: description.to_string(),
        })
    }

    pub async fn get_item(&self, id: i64) -> AgendaResult<Option<AgendaItem>> {
        let item = sqlx::query_as::<_, AgendaItem>(
            "SELECT id, datetime, all_day, description FROM agenda WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// All items, or just the one matching `filter_id`, newest first.
    pub async fn list_items(&self, filter_id: Option<i64>) -> AgendaResult<Vec<AgendaItem>> {
        let mut sql = String::from("SELECT id, datetime, all_day, description FROM agenda");
        if filter_id.is_some() {
            sql.push_str(" WHERE id = ?");
        }
        sql.push_str(" ORDER BY datetime DESC, id DESC");

        let mut query = sqlx::query_as::<_, AgendaItem>(&sql);
        if let Some(id) = filter_id {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Items at or after `from`, soonest first.
    pub async fn upcoming(&self, from: NaiveDateTime, limit: i64) -> AgendaResult<Vec<AgendaItem>> {
        let items = sqlx::query_as::<_, AgendaItem>(
            "SELECT id, datetime, all_day, description FROM agenda WHERE datetime >= ?1 ORDER BY datetime ASC, id ASC LIMIT ?2",
        )
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Returns whether a row was removed.
    pub async fn delete_item(&self, id: i64) -> AgendaResult<bool> {
        let result = sqlx::query("DELETE FROM agenda WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
