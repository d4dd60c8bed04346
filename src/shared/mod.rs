pub mod config;
pub mod error;

pub use config::{AppConfig, LifecycleConfig, StoreBackend};
pub use error::{AppError, Result};
