pub mod consistency_checker;
pub mod index_maintainer;
pub mod post_lifecycle_service;
pub mod record_repository;
mod seeding;
pub mod topic_lifecycle_service;

pub use consistency_checker::{ConsistencyChecker, ConsistencyReport, Drift};
pub use index_maintainer::SecondaryIndexMaintainer;
pub use post_lifecycle_service::PostLifecycleService;
pub use record_repository::RecordRepository;
pub use topic_lifecycle_service::TopicLifecycleService;
