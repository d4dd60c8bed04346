use super::index_maintainer::{settle, SecondaryIndexMaintainer};
use super::record_repository::RecordRepository;
use crate::application::ports::{
    AuditKind, AuditLog, ContentRenderer, KeyValueStore, LifecycleEvent, LifecycleHooks,
    PostPurger, PrivilegeChecker,
};
use crate::domain::entities::{LifecycleState, Post, Topic, Transition};
use crate::domain::keys::{self, field};
use crate::domain::plan::{MaintenancePlan, PostCascade};
use crate::domain::value_objects::{PostId, UserId};
use crate::shared::config::LifecycleConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 投稿の削除・復元・パージと、それに伴うトピック・ユーザー・カテゴリ集計の更新
///
/// The state check and the flag write are a read-then-act pair. Unless
/// `conditional_state_writes` is enabled, two concurrent deletes of the same post can
/// both pass the check and both decrement the counters.
pub struct PostLifecycleService {
    records: RecordRepository,
    maintainer: SecondaryIndexMaintainer,
    privileges: Arc<dyn PrivilegeChecker>,
    hooks: Arc<dyn LifecycleHooks>,
    audit: Arc<dyn AuditLog>,
    renderer: Arc<dyn ContentRenderer>,
    purger: Arc<dyn PostPurger>,
    config: LifecycleConfig,
}

impl PostLifecycleService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        privileges: Arc<dyn PrivilegeChecker>,
        hooks: Arc<dyn LifecycleHooks>,
        audit: Arc<dyn AuditLog>,
        renderer: Arc<dyn ContentRenderer>,
        purger: Arc<dyn PostPurger>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            records: RecordRepository::new(Arc::clone(&store)),
            maintainer: SecondaryIndexMaintainer::new(store),
            privileges,
            hooks,
            audit,
            renderer,
            purger,
            config,
        }
    }

    pub async fn delete(&self, actor: UserId, post_id: PostId) -> Result<Post, AppError> {
        self.toggle(actor, post_id, Transition::Delete).await
    }

    /// Restores the post and returns it with freshly rendered content.
    pub async fn restore(&self, actor: UserId, post_id: PostId) -> Result<Post, AppError> {
        let mut post = self.toggle(actor, post_id, Transition::Restore).await?;
        post.content = self.render(&post.content).await;
        Ok(post)
    }

    /// 認可のみ確認して物理削除を委譲する。集計値は呼び出し側の責任。
    pub async fn purge(&self, actor: UserId, post_id: PostId) -> Result<Post, AppError> {
        let mut post = self.load_post(post_id).await?;
        post.state.apply(Transition::Purge)?;
        self.authorize(post_id, actor).await?;

        self.purger.purge_post(post_id).await?;
        info!(post_id = %post_id, actor = %actor, "post purged");

        post.state = LifecycleState::Purged;
        Ok(post)
    }

    async fn toggle(
        &self,
        actor: UserId,
        post_id: PostId,
        transition: Transition,
    ) -> Result<Post, AppError> {
        let post = self.load_post(post_id).await?;
        let next_state = post.state.apply(transition)?;
        let topic = self
            .records
            .get_topic(post.topic_id)
            .await?
            .ok_or_else(|| AppError::not_found("topic", post.topic_id))?;
        self.authorize(post_id, actor).await?;

        self.records
            .write_state(
                &keys::post(post_id),
                post.state,
                next_state,
                self.config.conditional_state_writes,
            )
            .await?;

        let mut updated = post.clone();
        updated.state = next_state;

        match transition {
            Transition::Delete => {
                self.audit.log_event(AuditKind::PostDelete, actor, post_id);
                self.hooks.fire(LifecycleEvent::PostDeleted { post_id });
            }
            _ => {
                self.audit.log_event(AuditKind::PostRestore, actor, post_id);
                self.hooks.fire(LifecycleEvent::PostRestored {
                    post: updated.clone(),
                });
            }
        }

        let plan = MaintenancePlan::for_post(
            PostCascade {
                post: &post,
                category_id: topic.category_id,
                topic_state: topic.state,
            },
            transition,
        );
        let (counters, last_post) = tokio::join!(
            self.maintainer.apply(&plan),
            self.refresh_last_post_time(&topic)
        );
        settle(vec![
            ("post counters".to_string(), counters),
            (keys::topic(topic.id), last_post),
        ])?;

        debug!(
            post_id = %post_id,
            topic_id = %topic.id,
            actor = %actor,
            transition = %transition,
            "post lifecycle transition applied"
        );
        Ok(updated)
    }

    async fn load_post(&self, post_id: PostId) -> Result<Post, AppError> {
        self.records
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("post", post_id))
    }

    async fn authorize(&self, post_id: PostId, actor: UserId) -> Result<(), AppError> {
        match self.privileges.can_edit(post_id, actor).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::forbidden(actor, format!("post {post_id}"))),
            Err(err) => Err(AppError::Forbidden(format!(
                "privilege check for post {post_id} failed: {err}"
            ))),
        }
    }

    /// Points the topic's last-post time at its newest non-deleted post; leaves it
    /// unchanged when none remains.
    async fn refresh_last_post_time(&self, topic: &Topic) -> Result<(), AppError> {
        let latest = self
            .records
            .latest_active_post(topic.id, self.config.latest_post_scan_batch)
            .await?;
        let Some(latest) = latest else {
            debug!(topic_id = %topic.id, "no remaining post, last post time unchanged");
            return Ok(());
        };

        self.records
            .store()
            .set_field(
                &keys::topic(topic.id),
                field::LAST_POST_TIME,
                &latest.timestamp.to_string(),
            )
            .await?;
        if topic.is_active() {
            self.maintainer
                .add_to_index(keys::TOPICS_RECENT, latest.timestamp, &topic.id.to_string())
                .await?;
        }
        Ok(())
    }

    async fn render(&self, raw: &str) -> String {
        match self.renderer.render(raw).await {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(error = %err, "content render failed, returning raw content");
                raw.to_string()
            }
        }
    }
}
