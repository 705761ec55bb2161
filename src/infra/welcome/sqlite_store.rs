use crate::core::welcome::welcome_models::{WelcomeMessageRecord, DEFAULT_WELCOME_MESSAGE};
use crate::core::welcome::{WelcomeError, WelcomeMessageStore};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub struct SqliteWelcomeStore {
    pool: Pool<Sqlite>,
}

fn storage_err(e: sqlx::Error) -> WelcomeError {
    WelcomeError::Storage(e.to_string())
}

impl SqliteWelcomeStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new().connect(&conn_str).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_welcome_messages (
                guild_id INTEGER PRIMARY KEY,
                welcome_message TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[cfg(test)]
    async fn row_count(&self, guild_id: u64) -> i64 {
        sqlx::query("SELECT COUNT(*) FROM guild_welcome_messages WHERE guild_id = ?")
            .bind(guild_id as i64)
            .fetch_one(&self.pool)
            .await
            .map(|row| row.get::<i64, _>(0))
            .unwrap()
    }
}

#[async_trait]
impl WelcomeMessageStore for SqliteWelcomeStore {
    async fn get(&self, guild_id: u64) -> Result<Option<WelcomeMessageRecord>, WelcomeError> {
        let row = sqlx::query(
            "SELECT welcome_message FROM guild_welcome_messages WHERE guild_id = ?",
        )
        .bind(guild_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|row| WelcomeMessageRecord::new(guild_id, row.get::<String, _>("welcome_message"))))
    }

    async fn set(&self, guild_id: u64, message: &str) -> Result<(), WelcomeError> {
        sqlx::query(
            r#"
            INSERT INTO guild_welcome_messages (guild_id, welcome_message)
            VALUES (?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                welcome_message = excluded.welcome_message
            "#,
        )
        .bind(guild_id as i64)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn ensure_created(&self, guild_id: u64) -> Result<bool, WelcomeError> {
        let result = sqlx::query(
            r#"
            INSERT INTO guild_welcome_messages (guild_id, welcome_message)
            VALUES (?, ?)
            ON CONFLICT(guild_id) DO NOTHING
            "#,
        )
        .bind(guild_id as i64)
        .bind(DEFAULT_WELCOME_MESSAGE)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, guild_id: u64) -> Result<(), WelcomeError> {
        sqlx::query("DELETE FROM guild_welcome_messages WHERE guild_id = ?")
            .bind(guild_id as i64)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}
