//! SQLite store for already-posted items

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use tracing::info;

use newscord_core::{NewsItem, Video};

/// Store of posted news items and videos
pub struct SeenStore {
    conn: Mutex<Connection>,
}

impl SeenStore {
    /// Open (or create) the store at the given path
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(StoreError::Database)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Create an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Database)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Drop and recreate the tables, for initialize mode
    pub fn reset(&self) -> Result<(), StoreError> {
        {
            let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
            conn.execute_batch(
                r#"
                DROP TABLE IF EXISTS news_items;
                DROP TABLE IF EXISTS videos;
                "#,
            )
            .map_err(StoreError::Database)?;
        }
        info!("Dropped existing tables for re-initialization");
        self.init_schema()
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS news_items (
                pub_date TEXT,
                guid TEXT PRIMARY KEY,
                title TEXT,
                link TEXT,
                topic TEXT,
                related_news TEXT
            );

            CREATE TABLE IF NOT EXISTS videos (
                video_id TEXT PRIMARY KEY,
                title TEXT,
                channel TEXT,
                published_at TEXT,
                posted_at INTEGER DEFAULT (strftime('%s', 'now'))
            );
            "#,
        )
        .map_err(StoreError::Database)?;

        Ok(())
    }

    /// Check whether a news GUID has already been posted
    pub fn is_news_posted(&self, guid: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM news_items WHERE guid = ?1)",
                params![guid],
                |row| row.get(0),
            )
            .map_err(StoreError::Database)?;

        Ok(exists)
    }

    /// Record a posted news item.
    ///
    /// Related articles are stored as a JSON column plus flattened
    /// `related_title_N`/`related_press_N`/`related_link_N` columns, added
    /// with ALTER TABLE the first time an item needs them.
    pub fn record_news(&self, item: &NewsItem, topic: Option<&str>) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let existing = existing_columns(&conn)?;
        for i in 1..=item.related.len() {
            for prefix in ["related_title", "related_press", "related_link"] {
                let column = format!("{prefix}_{i}");
                if !existing.contains(&column) {
                    conn.execute(
                        &format!("ALTER TABLE news_items ADD COLUMN {column} TEXT"),
                        [],
                    )
                    .map_err(StoreError::Database)?;
                }
            }
        }

        let related_json =
            serde_json::to_string(&item.related).map_err(|e| StoreError::Serde(e.to_string()))?;

        let mut columns = vec![
            "pub_date".to_string(),
            "guid".to_string(),
            "title".to_string(),
            "link".to_string(),
            "topic".to_string(),
            "related_news".to_string(),
        ];
        let mut values: Vec<Value> = vec![
            Value::Text(item.pub_date_raw.clone()),
            Value::Text(item.guid.clone()),
            Value::Text(item.title.clone()),
            Value::Text(item.link.clone()),
            topic
                .map(|t| Value::Text(t.to_string()))
                .unwrap_or(Value::Null),
            Value::Text(related_json),
        ];

        for (i, article) in item.related.iter().enumerate() {
            columns.push(format!("related_title_{}", i + 1));
            columns.push(format!("related_press_{}", i + 1));
            columns.push(format!("related_link_{}", i + 1));
            values.push(Value::Text(article.title.clone()));
            values.push(Value::Text(article.press.clone()));
            values.push(Value::Text(article.link.clone()));
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO news_items ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );

        conn.execute(&sql, params_from_iter(values))
            .map_err(StoreError::Database)?;

        info!("Recorded news item: {}", item.guid);
        Ok(())
    }

    /// Check whether a video has already been posted
    pub fn is_video_posted(&self, video_id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM videos WHERE video_id = ?1)",
                params![video_id],
                |row| row.get(0),
            )
            .map_err(StoreError::Database)?;

        Ok(exists)
    }

    /// Record a posted video
    pub fn record_video(&self, video: &Video) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO videos (video_id, title, channel, published_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                video.id,
                video.title,
                video.channel_title,
                video.published_at.to_rfc3339(),
            ],
        )
        .map_err(StoreError::Database)?;

        info!("Recorded video: {}", video.id);
        Ok(())
    }

    /// Number of recorded news items
    pub fn news_count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM news_items", [], |row| row.get(0))
            .map_err(StoreError::Database)?;

        Ok(count as usize)
    }
}

/// Column names currently on the news_items table
fn existing_columns(conn: &Connection) -> Result<HashSet<String>, StoreError> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(news_items)")
        .map_err(StoreError::Database)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(StoreError::Database)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(columns)
}

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Failed to acquire lock")]
    LockError,
}
