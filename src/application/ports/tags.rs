use crate::domain::value_objects::TopicId;
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait TopicTagStore: Send + Sync {
    /// トピックに紐づくタグを全て外す
    async fn delete_topic_tags(&self, topic_id: TopicId) -> Result<(), AppError>;
}
