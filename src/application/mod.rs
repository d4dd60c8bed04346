pub mod ports;
pub mod services;
pub(crate) mod shared;

pub use services::{
    ConsistencyChecker, PostLifecycleService, SecondaryIndexMaintainer, TopicLifecycleService,
};
