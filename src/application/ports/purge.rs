use crate::domain::value_objects::PostId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// 投稿の物理削除。集計値の調整は行わない。
#[async_trait]
pub trait PostPurger: Send + Sync {
    async fn purge_post(&self, post_id: PostId) -> Result<(), AppError>;
}
