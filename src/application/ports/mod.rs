pub mod audit;
pub mod content;
pub mod hooks;
pub mod privileges;
pub mod purge;
pub mod store;
pub mod tags;

pub use audit::{AuditKind, AuditLog};
pub use content::ContentRenderer;
pub use hooks::{LifecycleEvent, LifecycleHooks};
pub use privileges::PrivilegeChecker;
pub use purge::PostPurger;
pub use store::KeyValueStore;
pub use tags::TopicTagStore;
