use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// 状態フラグを compare-and-set で書き込む（同一IDへの競合削除を弾く）
    pub conditional_state_writes: bool,
    /// 最新の未削除投稿を探すときの1回あたりの読み込み件数
    pub latest_post_scan_batch: usize,
    pub hook_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://data/forum.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            conditional_state_writes: false,
            latest_post_scan_batch: 20,
            hook_channel_capacity: 256,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FORUM_DATABASE_URL") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                cfg.database.url = trimmed.to_string();
            }
        }
        if let Some(value) = env_parsed::<u32>("FORUM_DATABASE_MAX_CONNECTIONS") {
            cfg.database.max_connections = value;
        }
        if let Some(value) = env_parsed::<u64>("FORUM_DATABASE_CONNECTION_TIMEOUT") {
            cfg.database.connection_timeout = value;
        }

        if let Ok(v) = std::env::var("FORUM_STORE_BACKEND") {
            cfg.store.backend = match v.trim().to_ascii_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                _ => cfg.store.backend,
            };
        }

        if let Ok(v) = std::env::var("FORUM_CONDITIONAL_STATE_WRITES") {
            cfg.lifecycle.conditional_state_writes =
                parse_bool(&v, cfg.lifecycle.conditional_state_writes);
        }
        if let Some(value) = env_parsed::<usize>("FORUM_LATEST_POST_SCAN_BATCH") {
            cfg.lifecycle.latest_post_scan_batch = value.max(1);
        }
        if let Some(value) = env_parsed::<usize>("FORUM_HOOK_CHANNEL_CAPACITY") {
            cfg.lifecycle.hook_channel_capacity = value.max(1);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.store.backend == StoreBackend::Sqlite && self.database.url.trim().is_empty() {
            return Err("Database url is required for the sqlite backend".to_string());
        }
        if self.lifecycle.latest_post_scan_batch == 0 {
            return Err("Lifecycle latest_post_scan_batch must be greater than 0".to_string());
        }
        if self.lifecycle.hook_channel_capacity == 0 {
            return Err("Lifecycle hook_channel_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse::<T>().ok()
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
