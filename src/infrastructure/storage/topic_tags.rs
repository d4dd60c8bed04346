use crate::application::ports::store::KeyValueStore;
use crate::application::ports::tags::TopicTagStore;
use crate::domain::keys;
use crate::domain::value_objects::TopicId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

/// `topic:{tid}:tags` と `tag:{tag}:topics` を使うタグ管理
pub struct StoreTopicTags {
    store: Arc<dyn KeyValueStore>,
}

impl StoreTopicTags {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn add_tag(&self, topic_id: TopicId, tag: &str, score: i64) -> Result<(), AppError> {
        let tid = topic_id.to_string();
        self.store
            .sorted_set_add(&keys::topic_tags(topic_id), score, tag)
            .await?;
        self.store
            .sorted_set_add(&keys::tag_topics(tag), score, &tid)
            .await
    }

    pub async fn topic_tags(&self, topic_id: TopicId) -> Result<Vec<String>, AppError> {
        let key = keys::topic_tags(topic_id);
        let count = self.store.sorted_set_card(&key).await?;
        self.store.sorted_set_rev_range(&key, 0, count).await
    }
}

#[async_trait]
impl TopicTagStore for StoreTopicTags {
    async fn delete_topic_tags(&self, topic_id: TopicId) -> Result<(), AppError> {
        let tid = topic_id.to_string();
        let tags = self.topic_tags(topic_id).await?;

        let removals = tags.iter().map(|tag| {
            let key = keys::tag_topics(tag);
            let store = Arc::clone(&self.store);
            let tid = tid.clone();
            async move { store.sorted_set_remove(&key, &tid).await }
        });
        try_join_all(removals).await?;

        self.store.delete_record(&keys::topic_tags(topic_id)).await
    }
}
