use crate::application::ports::store::KeyValueStore;
use crate::application::shared::mappers::{
    map_category_fields, map_global_fields, map_post_fields, map_topic_fields, CATEGORY_FIELDS,
    GLOBAL_FIELDS, POST_FIELDS, TOPIC_FIELDS,
};
use crate::domain::entities::{CategoryAggregate, GlobalAggregate, LifecycleState, Post, Topic};
use crate::domain::keys::{self, field};
use crate::domain::value_objects::{CategoryId, PostId, TopicId, UserId};
use crate::shared::error::AppError;
use std::sync::Arc;

/// ストア上の投稿・トピック・集計レコードの読み書き
#[derive(Clone)]
pub struct RecordRepository {
    store: Arc<dyn KeyValueStore>,
}

impl RecordRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub async fn get_post(&self, id: PostId) -> Result<Option<Post>, AppError> {
        let fields = self.store.get_fields(&keys::post(id), &POST_FIELDS).await?;
        map_post_fields(id, &fields)
    }

    pub async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>, AppError> {
        let fields = self.store.get_fields(&keys::topic(id), &TOPIC_FIELDS).await?;
        map_topic_fields(id, &fields)
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<CategoryAggregate, AppError> {
        let fields = self
            .store
            .get_fields(&keys::category(id), &CATEGORY_FIELDS)
            .await?;
        map_category_fields(id, &fields)
    }

    pub async fn get_global(&self) -> Result<GlobalAggregate, AppError> {
        let fields = self.store.get_fields(keys::GLOBAL, &GLOBAL_FIELDS).await?;
        map_global_fields(&fields)
    }

    pub async fn get_user_post_count(&self, id: UserId) -> Result<i64, AppError> {
        let value = self
            .store
            .get_field(&keys::user(id), field::POST_COUNT)
            .await?;
        Ok(value.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
    }

    /// 削除済みを含む全トピック（パージ済みは含まない）
    pub async fn all_topic_ids(&self) -> Result<Vec<TopicId>, AppError> {
        let count = self.store.sorted_set_card(keys::TOPICS_ALL).await?;
        let members = self
            .store
            .sorted_set_rev_range(keys::TOPICS_ALL, 0, count)
            .await?;
        parse_members(members)
    }

    pub async fn topic_post_ids(
        &self,
        topic_id: TopicId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PostId>, AppError> {
        let members = self
            .store
            .sorted_set_rev_range(&keys::topic_posts(topic_id), offset, limit)
            .await?;
        parse_members(members)
    }

    /// 新しい順に走査し、最初に見つかった未削除投稿を返す
    pub async fn latest_active_post(
        &self,
        topic_id: TopicId,
        batch: usize,
    ) -> Result<Option<Post>, AppError> {
        let batch = batch.max(1);
        let mut offset = 0;
        loop {
            let ids = self.topic_post_ids(topic_id, offset, batch).await?;
            if ids.is_empty() {
                return Ok(None);
            }
            for id in &ids {
                if let Some(post) = self.get_post(*id).await? {
                    if post.state.is_active() {
                        return Ok(Some(post));
                    }
                }
            }
            offset += ids.len();
        }
    }

    /// Writes the `deleted` flag. With `conditional`, the write is a compare-and-set
    /// against the flag observed now, so of two racing transitions only one lands.
    pub async fn write_state(
        &self,
        key: &str,
        from: LifecycleState,
        to: LifecycleState,
        conditional: bool,
    ) -> Result<(), AppError> {
        if !conditional {
            return self.store.set_field(key, field::DELETED, to.as_flag()).await;
        }

        let current = self.store.get_field(key, field::DELETED).await?;
        if LifecycleState::from_flag(current.as_deref()) != from {
            return Err(AppError::AlreadyInTargetState(format!(
                "{key} changed state before the write"
            )));
        }
        let swapped = self
            .store
            .compare_and_set_field(key, field::DELETED, current.as_deref(), to.as_flag())
            .await?;
        if swapped {
            Ok(())
        } else {
            Err(AppError::AlreadyInTargetState(format!(
                "{key} changed state concurrently"
            )))
        }
    }
}

fn parse_members<T>(members: Vec<String>) -> Result<Vec<T>, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    members
        .iter()
        .map(|member| member.parse::<T>().map_err(AppError::Storage))
        .collect()
}
