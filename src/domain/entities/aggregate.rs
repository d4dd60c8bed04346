use crate::domain::value_objects::CategoryId;
use serde::{Deserialize, Serialize};

/// カテゴリ単位の集計値（未削除の投稿・トピック数）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub category_id: CategoryId,
    pub post_count: i64,
    pub topic_count: i64,
}

impl CategoryAggregate {
    pub fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            post_count: 0,
            topic_count: 0,
        }
    }
}

/// Process-wide singleton counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalAggregate {
    pub topic_count: i64,
    pub post_count: i64,
}
