use super::lifecycle::LifecycleState;
use crate::domain::value_objects::{PostId, TopicId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub topic_id: TopicId,
    pub user_id: UserId,
    pub state: LifecycleState,
    pub content: String,
    /// 作成・編集時刻（ミリ秒）
    pub timestamp: i64,
    pub votes: i64,
}

impl Post {
    pub fn new(id: PostId, topic_id: TopicId, user_id: UserId, content: String) -> Self {
        Self {
            id,
            topic_id,
            user_id,
            state: LifecycleState::Active,
            content,
            timestamp: chrono::Utc::now().timestamp_millis(),
            votes: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.state == LifecycleState::Deleted
    }
}
