pub mod aggregate;
pub mod lifecycle;
pub mod post;
pub mod topic;

pub use aggregate::{CategoryAggregate, GlobalAggregate};
pub use lifecycle::{LifecycleState, Transition, TransitionError};
pub use post::Post;
pub use topic::{Topic, TopicScores};
