use crate::shared::config::DatabaseConfig;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ConnectionPool {
    pool: Arc<SqlitePool>,
}

impl ConnectionPool {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::connect(database_url, 5, Duration::from_secs(30)).await
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        Self::connect(
            &config.url,
            config.max_connections,
            Duration::from_secs(config.connection_timeout),
        )
        .await
    }

    /// インメモリDBは接続ごとに別DBになるため接続数を1に固定する
    pub async fn from_memory() -> Result<Self, sqlx::Error> {
        Self::connect("sqlite::memory:", 1, Duration::from_secs(30)).await
    }

    async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
