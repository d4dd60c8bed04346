pub mod category_id;
pub mod post_id;
pub mod topic_id;
pub mod user_id;

pub use category_id::CategoryId;
pub use post_id::PostId;
pub use topic_id::TopicId;
pub use user_id::UserId;
