use super::{read_i64, read_id};
use crate::domain::entities::{LifecycleState, Post};
use crate::domain::keys::field;
use crate::domain::value_objects::PostId;
use crate::shared::error::AppError;
use std::collections::HashMap;

pub(crate) const POST_FIELDS: [&str; 7] = [
    field::ID_POST,
    field::ID_TOPIC,
    field::ID_USER,
    field::CONTENT,
    field::TIMESTAMP,
    field::DELETED,
    field::VOTES,
];

/// 空のフィールドマップは記録なし（`None`）として扱う
pub(crate) fn map_post_fields(
    id: PostId,
    fields: &HashMap<String, String>,
) -> Result<Option<Post>, AppError> {
    if fields.is_empty() {
        return Ok(None);
    }

    Ok(Some(Post {
        id,
        topic_id: read_id(fields, field::ID_TOPIC)?,
        user_id: read_id(fields, field::ID_USER)?,
        state: LifecycleState::from_flag(fields.get(field::DELETED).map(String::as_str)),
        content: fields.get(field::CONTENT).cloned().unwrap_or_default(),
        timestamp: read_i64(fields, field::TIMESTAMP)?,
        votes: read_i64(fields, field::VOTES)?,
    }))
}

pub(crate) fn post_to_fields(post: &Post) -> Vec<(&'static str, String)> {
    vec![
        (field::ID_POST, post.id.to_string()),
        (field::ID_TOPIC, post.topic_id.to_string()),
        (field::ID_USER, post.user_id.to_string()),
        (field::CONTENT, post.content.clone()),
        (field::TIMESTAMP, post.timestamp.to_string()),
        (field::DELETED, post.state.as_flag().to_string()),
        (field::VOTES, post.votes.to_string()),
    ]
}
