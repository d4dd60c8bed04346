pub mod memory_store;
pub mod post_purger;
pub mod store_privileges;
pub mod topic_tags;

pub use memory_store::InMemoryStore;
pub use post_purger::StorePostPurger;
pub use store_privileges::StorePrivilegeChecker;
pub use topic_tags::StoreTopicTags;
