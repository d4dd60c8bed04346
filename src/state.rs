use crate::application::ports::{KeyValueStore, LifecycleHooks};
use crate::application::services::{
    ConsistencyChecker, PostLifecycleService, TopicLifecycleService,
};
use crate::infrastructure::content::EscapingContentRenderer;
use crate::infrastructure::database::{ConnectionPool, SqliteStore};
use crate::infrastructure::event::{BroadcastLifecycleHooks, TracingAuditLog};
use crate::infrastructure::storage::{
    InMemoryStore, StorePostPurger, StorePrivilegeChecker, StoreTopicTags,
};
use crate::shared::config::{AppConfig, StoreBackend};
use crate::shared::error::AppError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// エンジン全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub hooks: Arc<BroadcastLifecycleHooks>,
    pub post_lifecycle: Arc<PostLifecycleService>,
    pub topic_lifecycle: Arc<TopicLifecycleService>,
    pub consistency_checker: Arc<ConsistencyChecker>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(AppError::ConfigurationError)?;

        let store: Arc<dyn KeyValueStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryStore::new()),
            StoreBackend::Sqlite => {
                if let Some(dir) = sqlite_parent_dir(&config.database.url) {
                    std::fs::create_dir_all(dir)?;
                }
                let pool = ConnectionPool::from_config(&config.database).await?;
                let store = SqliteStore::new(pool);
                store.initialize().await?;
                Arc::new(store)
            }
        };
        info!(backend = ?config.store.backend, "store initialized");

        Ok(Self::with_store(config, store))
    }

    /// Wires the default adapters around an already opened store.
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let hooks = Arc::new(BroadcastLifecycleHooks::new(
            config.lifecycle.hook_channel_capacity,
        ));
        let hook_sink: Arc<dyn LifecycleHooks> = Arc::clone(&hooks) as Arc<dyn LifecycleHooks>;

        let post_lifecycle = Arc::new(PostLifecycleService::new(
            Arc::clone(&store),
            Arc::new(StorePrivilegeChecker::new(Arc::clone(&store))),
            Arc::clone(&hook_sink),
            Arc::new(TracingAuditLog),
            Arc::new(EscapingContentRenderer),
            Arc::new(StorePostPurger::new(Arc::clone(&store))),
            config.lifecycle.clone(),
        ));
        let topic_lifecycle = Arc::new(TopicLifecycleService::new(
            Arc::clone(&store),
            hook_sink,
            Arc::new(StoreTopicTags::new(Arc::clone(&store))),
            config.lifecycle.clone(),
        ));
        let consistency_checker = Arc::new(ConsistencyChecker::new(Arc::clone(&store)));

        Self {
            config,
            store,
            hooks,
            post_lifecycle,
            topic_lifecycle,
            consistency_checker,
        }
    }
}

/// `sqlite://path/to/db?mode=rwc` の親ディレクトリ。インメモリURLなら None。
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Post, Topic};
    use crate::domain::value_objects::{CategoryId, PostId, TopicId, UserId};
    use crate::application::services::RecordRepository;

    #[test]
    fn sqlite_parent_dir_handles_file_and_memory_urls() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/forum.db?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(sqlite_parent_dir("sqlite://forum.db"), None);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.lifecycle.latest_post_scan_batch = 0;
        let err = AppState::new(config).await.err().unwrap();
        assert!(err.to_string().contains("latest_post_scan_batch"));
    }

    #[tokio::test]
    async fn memory_backend_wires_services_to_one_store() {
        let state = AppState::new(AppConfig::default()).await.unwrap();
        let records = RecordRepository::new(Arc::clone(&state.store));
        let mut topic = Topic::new(TopicId::new(1), CategoryId::new(1), UserId::new(2));
        topic.last_post_time = 0;
        records.insert_topic(&topic).await.unwrap();
        records
            .insert_post(&Post::new(PostId::new(1), TopicId::new(1), UserId::new(2), "x".into()))
            .await
            .unwrap();

        let mut events = state.hooks.subscribe();
        state
            .post_lifecycle
            .delete(UserId::new(2), PostId::new(1))
            .await
            .unwrap();
        assert_eq!(events.recv().await.unwrap().name(), "action:post.delete");

        let report = state.consistency_checker.check().await.unwrap();
        assert!(report.is_consistent(), "{:?}", report.drifts);
    }
}
