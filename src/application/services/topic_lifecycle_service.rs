use super::index_maintainer::{settle, SecondaryIndexMaintainer};
use super::record_repository::RecordRepository;
use crate::application::ports::{KeyValueStore, LifecycleEvent, LifecycleHooks, TopicTagStore};
use crate::domain::entities::{LifecycleState, Topic, Transition};
use crate::domain::keys;
use crate::domain::plan::MaintenancePlan;
use crate::domain::value_objects::TopicId;
use crate::shared::config::LifecycleConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

/// トピックの削除・復元・パージ
pub struct TopicLifecycleService {
    records: RecordRepository,
    maintainer: SecondaryIndexMaintainer,
    hooks: Arc<dyn LifecycleHooks>,
    tags: Arc<dyn TopicTagStore>,
    config: LifecycleConfig,
}

impl TopicLifecycleService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        hooks: Arc<dyn LifecycleHooks>,
        tags: Arc<dyn TopicTagStore>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            records: RecordRepository::new(Arc::clone(&store)),
            maintainer: SecondaryIndexMaintainer::new(store),
            hooks,
            tags,
            config,
        }
    }

    /// Soft-deletes the topic and takes it out of the ordering indexes. Aggregate
    /// post counts drop by the topic's stored post-count as read now.
    pub async fn delete(&self, topic_id: TopicId) -> Result<Topic, AppError> {
        self.toggle(topic_id, Transition::Delete).await
    }

    /// Restores the topic, re-scoring the ordering indexes from its current fields.
    pub async fn restore(&self, topic_id: TopicId) -> Result<Topic, AppError> {
        self.toggle(topic_id, Transition::Restore).await
    }

    /// Removes every reference to the topic, then the record itself.
    ///
    /// `topic_count` aggregates are decremented only when the topic was still active;
    /// a deleted topic has already been subtracted once. If a reference removal fails
    /// the record is kept so the purge can be retried.
    pub async fn purge(&self, topic_id: TopicId) -> Result<Topic, AppError> {
        let mut topic = self.load_topic(topic_id).await?;
        topic.state.apply(Transition::Purge)?;

        let removals = MaintenancePlan::for_topic_purge(&topic);
        let (references, tags) = tokio::join!(
            self.maintainer.apply(&removals),
            self.tags.delete_topic_tags(topic_id)
        );
        settle(vec![
            ("topic references".to_string(), references),
            (keys::topic_tags(topic_id), tags),
        ])?;

        self.maintainer
            .apply(&MaintenancePlan::for_topic_purge_counters(&topic))
            .await?;

        self.hooks.fire(LifecycleEvent::TopicPurged { topic_id });
        self.records.store().delete_record(&keys::topic(topic_id)).await?;

        info!(
            topic_id = %topic_id,
            was_active = topic.is_active(),
            "topic purged"
        );
        topic.state = LifecycleState::Purged;
        Ok(topic)
    }

    async fn toggle(&self, topic_id: TopicId, transition: Transition) -> Result<Topic, AppError> {
        let topic = self.load_topic(topic_id).await?;
        let next_state = topic.state.apply(transition)?;

        self.records
            .write_state(
                &keys::topic(topic_id),
                topic.state,
                next_state,
                self.config.conditional_state_writes,
            )
            .await?;

        let plan = MaintenancePlan::for_topic(&topic, transition);
        self.maintainer.apply(&plan).await?;

        debug!(
            topic_id = %topic_id,
            transition = %transition,
            post_count = topic.post_count,
            "topic lifecycle transition applied"
        );
        let mut updated = topic;
        updated.state = next_state;
        Ok(updated)
    }

    async fn load_topic(&self, topic_id: TopicId) -> Result<Topic, AppError> {
        self.records
            .get_topic(topic_id)
            .await?
            .ok_or_else(|| AppError::not_found("topic", topic_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CategoryId, UserId};
    use crate::infrastructure::storage::{InMemoryStore, StoreTopicTags};
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        pub Tags {}

        #[async_trait]
        impl TopicTagStore for Tags {
            async fn delete_topic_tags(&self, topic_id: TopicId) -> Result<(), AppError>;
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<LifecycleEvent>>,
    }

    impl LifecycleHooks for RecordingHooks {
        fn fire(&self, event: LifecycleEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        records: RecordRepository,
        hooks: Arc<RecordingHooks>,
    }

    impl Fixture {
        /// Category 7 holds three topics; topic 1 has postcount=5 and viewcount=10.
        async fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let records = RecordRepository::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
            for (tid, posts, views) in [(1, 5, 10), (2, 1, 1), (3, 2, 4)] {
                let mut topic = Topic::new(TopicId::new(tid), CategoryId::new(7), UserId::new(9));
                topic.post_count = posts;
                topic.view_count = views;
                topic.last_post_time = 1_000 + tid as i64;
                records.insert_topic(&topic).await.unwrap();
            }
            Self {
                store,
                records,
                hooks: Arc::new(RecordingHooks::default()),
            }
        }

        fn service(&self) -> TopicLifecycleService {
            let store = Arc::clone(&self.store) as Arc<dyn KeyValueStore>;
            TopicLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&self.hooks) as Arc<dyn LifecycleHooks>,
                Arc::new(StoreTopicTags::new(store)),
                LifecycleConfig::default(),
            )
        }

        async fn indexed(&self, tid: &str) -> Vec<Option<i64>> {
            let mut scores = Vec::new();
            for index in keys::TOPIC_ORDERING_INDEXES {
                scores.push(self.store.sorted_set_score(index, tid).await.unwrap());
            }
            scores
        }
    }

    #[tokio::test]
    async fn delete_then_restore_round_trips_counters_and_indexes() {
        let fixture = Fixture::new().await;
        let service = fixture.service();

        let deleted = service.delete(TopicId::new(1)).await.unwrap();
        assert_eq!(deleted.state, LifecycleState::Deleted);
        let category = fixture.records.get_category(CategoryId::new(7)).await.unwrap();
        assert_eq!(category.topic_count, 2);
        assert_eq!(category.post_count, 3);
        let global = fixture.records.get_global().await.unwrap();
        assert_eq!((global.topic_count, global.post_count), (2, 3));
        assert_eq!(fixture.indexed("1").await, vec![None, None, None]);

        service.restore(TopicId::new(1)).await.unwrap();
        let category = fixture.records.get_category(CategoryId::new(7)).await.unwrap();
        assert_eq!(category.topic_count, 3);
        assert_eq!(category.post_count, 8);
        assert_eq!(
            fixture.indexed("1").await,
            vec![Some(1_001), Some(5), Some(10)]
        );
    }

    #[tokio::test]
    async fn restore_scores_from_fields_changed_while_deleted() {
        let fixture = Fixture::new().await;
        let service = fixture.service();

        service.delete(TopicId::new(2)).await.unwrap();
        fixture
            .store
            .set_field("topic:2", "viewcount", "42")
            .await
            .unwrap();
        service.restore(TopicId::new(2)).await.unwrap();

        assert_eq!(
            fixture.store.sorted_set_score("topics:views", "2").await.unwrap(),
            Some(42)
        );
    }

    #[tokio::test]
    async fn repeated_delete_is_rejected_without_writes() {
        let fixture = Fixture::new().await;
        let service = fixture.service();

        service.delete(TopicId::new(1)).await.unwrap();
        let second = service.delete(TopicId::new(1)).await;
        assert!(matches!(second, Err(AppError::AlreadyInTargetState(_))));
        assert_eq!(fixture.records.get_global().await.unwrap().topic_count, 2);

        let restore_active = service.restore(TopicId::new(2)).await;
        assert!(matches!(restore_active, Err(AppError::AlreadyInTargetState(_))));
    }

    #[tokio::test]
    async fn purge_of_active_topic_decrements_topic_count_once() {
        let fixture = Fixture::new().await;
        let service = fixture.service();

        let purged = service.purge(TopicId::new(3)).await.unwrap();
        assert_eq!(purged.state, LifecycleState::Purged);
        assert_eq!(
            fixture.records.get_category(CategoryId::new(7)).await.unwrap().topic_count,
            2
        );
        assert_eq!(fixture.records.get_global().await.unwrap().topic_count, 2);
        assert!(fixture.records.get_topic(TopicId::new(3)).await.unwrap().is_none());
        assert_eq!(fixture.indexed("3").await, vec![None, None, None]);
        assert_eq!(
            *fixture.hooks.events.lock().unwrap(),
            vec![LifecycleEvent::TopicPurged {
                topic_id: TopicId::new(3)
            }]
        );
    }

    #[tokio::test]
    async fn purge_of_deleted_topic_does_not_decrement_again() {
        let fixture = Fixture::new().await;
        let service = fixture.service();

        service.delete(TopicId::new(3)).await.unwrap();
        service.purge(TopicId::new(3)).await.unwrap();

        assert_eq!(
            fixture.records.get_category(CategoryId::new(7)).await.unwrap().topic_count,
            2
        );
        assert_eq!(fixture.records.get_global().await.unwrap().topic_count, 2);
        assert!(!fixture.store.exists("topic:3").await.unwrap());
    }

    #[tokio::test]
    async fn purge_clears_follower_and_membership_sets() {
        let fixture = Fixture::new().await;
        fixture
            .store
            .sorted_set_add("tid:1:followers", 1, "9")
            .await
            .unwrap();
        fixture
            .store
            .sorted_set_add("tid:1:read_by_uid", 1, "9")
            .await
            .unwrap();

        fixture.service().purge(TopicId::new(1)).await.unwrap();

        for key in ["tid:1:followers", "tid:1:read_by_uid"] {
            assert!(!fixture.store.exists(key).await.unwrap());
        }
        for index in ["topics:tid", "categories:7:tid", "uid:9:topics"] {
            assert_eq!(fixture.store.sorted_set_score(index, "1").await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn failed_tag_cleanup_keeps_record_for_retry() {
        let fixture = Fixture::new().await;
        let mut tags = MockTags::new();
        tags.expect_delete_topic_tags()
            .times(1)
            .returning(|_| Err(AppError::Storage("tag store offline".into())));
        let service = TopicLifecycleService::new(
            Arc::clone(&fixture.store) as Arc<dyn KeyValueStore>,
            Arc::clone(&fixture.hooks) as Arc<dyn LifecycleHooks>,
            Arc::new(tags),
            LifecycleConfig::default(),
        );

        let result = service.purge(TopicId::new(1)).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(fixture.store.exists("topic:1").await.unwrap());
        assert_eq!(fixture.records.get_global().await.unwrap().topic_count, 3);
        assert!(fixture.hooks.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let service = Fixture::new().await.service();
        assert!(matches!(
            service.purge(TopicId::new(77)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(TopicId::new(77)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
