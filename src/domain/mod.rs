pub mod entities;
pub mod keys;
pub mod plan;
pub mod value_objects;

pub use plan::{IndexOp, MaintenancePlan, PostCascade, Rescore};
