pub(crate) mod aggregates;
pub(crate) mod posts;
pub(crate) mod topics;

pub(crate) use aggregates::{map_category_fields, map_global_fields, CATEGORY_FIELDS, GLOBAL_FIELDS};
pub(crate) use posts::{map_post_fields, post_to_fields, POST_FIELDS};
pub(crate) use topics::{map_topic_fields, topic_to_fields, TOPIC_FIELDS};

use crate::shared::error::AppError;
use std::collections::HashMap;
use std::str::FromStr;

pub(crate) fn read_i64(fields: &HashMap<String, String>, name: &str) -> Result<i64, AppError> {
    match fields.get(name).map(|v| v.trim()) {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::Storage(format!("field {name} is not an integer: {raw:?}"))),
    }
}

pub(crate) fn read_id<T>(fields: &HashMap<String, String>, name: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    let raw = fields
        .get(name)
        .ok_or_else(|| AppError::Storage(format!("record is missing field {name}")))?;
    raw.parse::<T>().map_err(AppError::Storage)
}
