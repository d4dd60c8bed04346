use super::{read_i64, read_id};
use crate::domain::entities::{LifecycleState, Topic};
use crate::domain::keys::field;
use crate::domain::value_objects::TopicId;
use crate::shared::error::AppError;
use std::collections::HashMap;

pub(crate) const TOPIC_FIELDS: [&str; 7] = [
    field::ID_TOPIC,
    field::ID_CATEGORY,
    field::ID_USER,
    field::DELETED,
    field::POST_COUNT,
    field::VIEW_COUNT,
    field::LAST_POST_TIME,
];

pub(crate) fn map_topic_fields(
    id: TopicId,
    fields: &HashMap<String, String>,
) -> Result<Option<Topic>, AppError> {
    if fields.is_empty() {
        return Ok(None);
    }

    Ok(Some(Topic {
        id,
        category_id: read_id(fields, field::ID_CATEGORY)?,
        user_id: read_id(fields, field::ID_USER)?,
        state: LifecycleState::from_flag(fields.get(field::DELETED).map(String::as_str)),
        post_count: read_i64(fields, field::POST_COUNT)?,
        view_count: read_i64(fields, field::VIEW_COUNT)?,
        last_post_time: read_i64(fields, field::LAST_POST_TIME)?,
    }))
}

pub(crate) fn topic_to_fields(topic: &Topic) -> Vec<(&'static str, String)> {
    vec![
        (field::ID_TOPIC, topic.id.to_string()),
        (field::ID_CATEGORY, topic.category_id.to_string()),
        (field::ID_USER, topic.user_id.to_string()),
        (field::DELETED, topic.state.as_flag().to_string()),
        (field::POST_COUNT, topic.post_count.to_string()),
        (field::VIEW_COUNT, topic.view_count.to_string()),
        (field::LAST_POST_TIME, topic.last_post_time.to_string()),
    ]
}
