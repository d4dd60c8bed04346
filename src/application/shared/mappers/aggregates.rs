use super::read_i64;
use crate::domain::entities::{CategoryAggregate, GlobalAggregate};
use crate::domain::keys;
use crate::domain::value_objects::CategoryId;
use crate::shared::error::AppError;
use std::collections::HashMap;

pub(crate) const CATEGORY_FIELDS: [&str; 2] = [keys::CATEGORY_POST_COUNT, keys::CATEGORY_TOPIC_COUNT];
pub(crate) const GLOBAL_FIELDS: [&str; 2] = [keys::GLOBAL_TOPIC_COUNT, keys::GLOBAL_POST_COUNT];

pub(crate) fn map_category_fields(
    category_id: CategoryId,
    fields: &HashMap<String, String>,
) -> Result<CategoryAggregate, AppError> {
    Ok(CategoryAggregate {
        category_id,
        post_count: read_i64(fields, keys::CATEGORY_POST_COUNT)?,
        topic_count: read_i64(fields, keys::CATEGORY_TOPIC_COUNT)?,
    })
}

pub(crate) fn map_global_fields(
    fields: &HashMap<String, String>,
) -> Result<GlobalAggregate, AppError> {
    Ok(GlobalAggregate {
        topic_count: read_i64(fields, keys::GLOBAL_TOPIC_COUNT)?,
        post_count: read_i64(fields, keys::GLOBAL_POST_COUNT)?,
    })
}
