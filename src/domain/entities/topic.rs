use super::lifecycle::LifecycleState;
use crate::domain::value_objects::{CategoryId, TopicId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub id: TopicId,
    pub category_id: CategoryId,
    pub user_id: UserId,
    pub state: LifecycleState,
    /// Posts ever attributed to the topic and not purged; soft-deleted posts still
    /// decrement it through the post lifecycle.
    pub post_count: i64,
    pub view_count: i64,
    pub last_post_time: i64,
}

impl Topic {
    pub fn new(id: TopicId, category_id: CategoryId, user_id: UserId) -> Self {
        Self {
            id,
            category_id,
            user_id,
            state: LifecycleState::Active,
            post_count: 0,
            view_count: 0,
            last_post_time: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

/// 順序インデックス上でトピックが持つスコア一式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicScores {
    pub recent: i64,
    pub posts: i64,
    pub views: i64,
}

impl From<&Topic> for TopicScores {
    fn from(topic: &Topic) -> Self {
        Self {
            recent: topic.last_post_time,
            posts: topic.post_count,
            views: topic.view_count,
        }
    }
}
