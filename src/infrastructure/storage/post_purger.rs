use crate::application::ports::purge::PostPurger;
use crate::application::ports::store::KeyValueStore;
use crate::domain::keys::{self, field};
use crate::domain::value_objects::{CategoryId, PostId, TopicId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// 投稿レコードとその投稿IDを含むインデックスを物理削除する
///
/// Counters are left untouched; the caller owns that bookkeeping.
pub struct StorePostPurger {
    store: Arc<dyn KeyValueStore>,
}

impl StorePostPurger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostPurger for StorePostPurger {
    async fn purge_post(&self, post_id: PostId) -> Result<(), AppError> {
        let post_key = keys::post(post_id);
        let pid = post_id.to_string();

        if let Some(tid) = self.store.get_field(&post_key, field::ID_TOPIC).await? {
            let topic_id: TopicId = tid.parse().map_err(AppError::Storage)?;
            self.store
                .sorted_set_remove(&keys::topic_posts(topic_id), &pid)
                .await?;

            let cid = self
                .store
                .get_field(&keys::topic(topic_id), field::ID_CATEGORY)
                .await?;
            if let Some(cid) = cid {
                let category_id: CategoryId = cid.parse().map_err(AppError::Storage)?;
                self.store
                    .sorted_set_remove(&keys::category_recent_posts(category_id), &pid)
                    .await?;
            }
        }

        self.store.delete_record(&post_key).await?;
        debug!(post_id = %post_id, "post record purged");
        Ok(())
    }
}
