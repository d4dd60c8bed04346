//! Seeding helpers for `RecordRepository`.
//!
//! These stand in for the posting subsystem, which owns creation in a running forum.
//! They lay down a topic or reply with the index memberships and aggregate counters the
//! lifecycle managers expect, and are used by fixtures and tests only. No lifecycle
//! operation calls them.

use super::RecordRepository;
use crate::application::shared::mappers::{post_to_fields, topic_to_fields};
use crate::domain::entities::{Post, Topic};
use crate::domain::keys::{self, field};
use crate::shared::error::AppError;

impl RecordRepository {
    /// Stores a topic the way the posting subsystem creates one: record, membership in
    /// the category/user/all-topics indexes and, while active, the ordering indexes and
    /// aggregate counters for its current post-count.
    pub async fn insert_topic(&self, topic: &Topic) -> Result<(), AppError> {
        let store = self.store();
        let tid = topic.id.to_string();
        store
            .set_fields(&keys::topic(topic.id), &topic_to_fields(topic))
            .await?;
        store
            .sorted_set_add(keys::TOPICS_ALL, topic.last_post_time, &tid)
            .await?;
        store
            .sorted_set_add(
                &keys::category_topics(topic.category_id),
                topic.last_post_time,
                &tid,
            )
            .await?;
        store
            .sorted_set_add(&keys::user_topics(topic.user_id), topic.last_post_time, &tid)
            .await?;

        if !topic.is_active() {
            return Ok(());
        }

        store
            .sorted_set_add(keys::TOPICS_RECENT, topic.last_post_time, &tid)
            .await?;
        store
            .sorted_set_add(keys::TOPICS_POSTS, topic.post_count, &tid)
            .await?;
        store
            .sorted_set_add(keys::TOPICS_VIEWS, topic.view_count, &tid)
            .await?;

        let category = keys::category(topic.category_id);
        store
            .incr_field(keys::GLOBAL, keys::GLOBAL_TOPIC_COUNT, 1)
            .await?;
        store
            .incr_field(keys::GLOBAL, keys::GLOBAL_POST_COUNT, topic.post_count)
            .await?;
        store
            .incr_field(&category, keys::CATEGORY_TOPIC_COUNT, 1)
            .await?;
        store
            .incr_field(&category, keys::CATEGORY_POST_COUNT, topic.post_count)
            .await?;
        Ok(())
    }

    /// Stores a reply the way the posting subsystem does. An active post bumps the
    /// topic, user, category and global post-counts and becomes the topic's last post.
    pub async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        let topic = self
            .get_topic(post.topic_id)
            .await?
            .ok_or_else(|| AppError::not_found("topic", post.topic_id))?;
        let store = self.store();
        let pid = post.id.to_string();
        let tid = post.topic_id.to_string();

        store
            .set_fields(&keys::post(post.id), &post_to_fields(post))
            .await?;
        store
            .sorted_set_add(&keys::topic_posts(post.topic_id), post.timestamp, &pid)
            .await?;

        if !post.state.is_active() {
            return Ok(());
        }

        store
            .sorted_set_add(
                &keys::category_recent_posts(topic.category_id),
                post.timestamp,
                &pid,
            )
            .await?;
        let topic_key = keys::topic(post.topic_id);
        let post_count = store.incr_field(&topic_key, field::POST_COUNT, 1).await?;
        let user_post_count = store
            .incr_field(&keys::user(post.user_id), field::POST_COUNT, 1)
            .await?;
        store
            .sorted_set_add(
                keys::USERS_POSTCOUNT,
                user_post_count,
                &post.user_id.to_string(),
            )
            .await?;
        store
            .incr_field(keys::GLOBAL, keys::GLOBAL_POST_COUNT, 1)
            .await?;
        store
            .incr_field(
                &keys::category(topic.category_id),
                keys::CATEGORY_POST_COUNT,
                1,
            )
            .await?;

        if post.timestamp >= topic.last_post_time {
            store
                .set_field(&topic_key, field::LAST_POST_TIME, &post.timestamp.to_string())
                .await?;
        }
        if topic.is_active() {
            store
                .sorted_set_add(keys::TOPICS_POSTS, post_count, &tid)
                .await?;
            if post.timestamp >= topic.last_post_time {
                store
                    .sorted_set_add(keys::TOPICS_RECENT, post.timestamp, &tid)
                    .await?;
            }
        }
        Ok(())
    }
}
