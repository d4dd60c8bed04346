use crate::application::ports::privileges::PrivilegeChecker;
use crate::application::ports::store::KeyValueStore;
use crate::domain::keys::{self, field};
use crate::domain::value_objects::{PostId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

/// 投稿者本人か管理者グループのメンバーであれば編集可能
pub struct StorePrivilegeChecker {
    store: Arc<dyn KeyValueStore>,
}

impl StorePrivilegeChecker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn is_administrator(&self, actor: UserId) -> Result<bool, AppError> {
        Ok(self
            .store
            .sorted_set_score(keys::ADMINISTRATORS, &actor.to_string())
            .await?
            .is_some())
    }
}

#[async_trait]
impl PrivilegeChecker for StorePrivilegeChecker {
    async fn can_edit(&self, post_id: PostId, actor: UserId) -> Result<bool, AppError> {
        if self.is_administrator(actor).await? {
            return Ok(true);
        }

        let owner = self
            .store
            .get_field(&keys::post(post_id), field::ID_USER)
            .await?;
        Ok(owner.as_deref().map(str::trim) == Some(actor.to_string().as_str()))
    }
}
