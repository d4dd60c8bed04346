use crate::domain::entities::Post;
use crate::domain::value_objects::{PostId, TopicId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    PostDeleted { post_id: PostId },
    PostRestored { post: Post },
    /// Published as `action:topic.delete`; soft deletes of topics fire no hook.
    TopicPurged { topic_id: TopicId },
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::PostDeleted { .. } => "action:post.delete",
            LifecycleEvent::PostRestored { .. } => "action:post.restore",
            LifecycleEvent::TopicPurged { .. } => "action:topic.delete",
        }
    }
}

/// ライフサイクルイベントの通知先（fire-and-forget）
///
/// 実装側は呼び出し元をブロックしてはならず、配送エラーは実装側でログに残す。
pub trait LifecycleHooks: Send + Sync {
    fn fire(&self, event: LifecycleEvent);
}
