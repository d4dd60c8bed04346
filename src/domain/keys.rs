//! Storage key schema shared by the lifecycle services and adapters.

use crate::domain::value_objects::{CategoryId, PostId, TopicId, UserId};

pub const GLOBAL: &str = "global";
pub const GLOBAL_TOPIC_COUNT: &str = "topicCount";
pub const GLOBAL_POST_COUNT: &str = "postCount";

pub const CATEGORY_POST_COUNT: &str = "post_count";
pub const CATEGORY_TOPIC_COUNT: &str = "topic_count";

pub const TOPICS_RECENT: &str = "topics:recent";
pub const TOPICS_POSTS: &str = "topics:posts";
pub const TOPICS_VIEWS: &str = "topics:views";
pub const TOPICS_ALL: &str = "topics:tid";
pub const USERS_POSTCOUNT: &str = "users:postcount";
pub const ADMINISTRATORS: &str = "group:administrators:members";

/// The three topic ordering indexes, in the order scores are listed in `TopicScores`.
pub const TOPIC_ORDERING_INDEXES: [&str; 3] = [TOPICS_RECENT, TOPICS_POSTS, TOPICS_VIEWS];

pub mod field {
    pub const ID_POST: &str = "pid";
    pub const ID_TOPIC: &str = "tid";
    pub const ID_USER: &str = "uid";
    pub const ID_CATEGORY: &str = "cid";
    pub const DELETED: &str = "deleted";
    pub const CONTENT: &str = "content";
    pub const TIMESTAMP: &str = "timestamp";
    pub const VOTES: &str = "votes";
    pub const POST_COUNT: &str = "postcount";
    pub const VIEW_COUNT: &str = "viewcount";
    pub const LAST_POST_TIME: &str = "lastposttime";
}

pub fn post(id: PostId) -> String {
    format!("post:{id}")
}

pub fn topic(id: TopicId) -> String {
    format!("topic:{id}")
}

pub fn user(id: UserId) -> String {
    format!("user:{id}")
}

pub fn category(id: CategoryId) -> String {
    format!("category:{id}")
}

pub fn category_topics(id: CategoryId) -> String {
    format!("categories:{id}:tid")
}

pub fn category_recent_posts(id: CategoryId) -> String {
    format!("categories:recent_posts:cid:{id}")
}

pub fn user_topics(id: UserId) -> String {
    format!("uid:{id}:topics")
}

pub fn topic_posts(id: TopicId) -> String {
    format!("tid:{id}:posts")
}

pub fn topic_followers(id: TopicId) -> String {
    format!("tid:{id}:followers")
}

pub fn topic_read_by(id: TopicId) -> String {
    format!("tid:{id}:read_by_uid")
}

pub fn topic_tags(id: TopicId) -> String {
    format!("topic:{id}:tags")
}

pub fn tag_topics(tag: &str) -> String {
    format!("tag:{tag}:topics")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_forum_layout() {
        assert_eq!(topic(TopicId::new(3)), "topic:3");
        assert_eq!(
            category_recent_posts(CategoryId::new(2)),
            "categories:recent_posts:cid:2"
        );
        assert_eq!(user_topics(UserId::new(8)), "uid:8:topics");
        assert_eq!(topic_posts(TopicId::new(3)), "tid:3:posts");
    }
}
