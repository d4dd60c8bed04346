pub mod broadcast_hooks;
pub mod tracing_audit;

pub use broadcast_hooks::BroadcastLifecycleHooks;
pub use tracing_audit::TracingAuditLog;
