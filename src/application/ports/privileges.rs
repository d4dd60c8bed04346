use crate::domain::value_objects::{PostId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// 投稿の編集権限チェック
#[async_trait]
pub trait PrivilegeChecker: Send + Sync {
    async fn can_edit(&self, post_id: PostId, actor: UserId) -> Result<bool, AppError>;
}
