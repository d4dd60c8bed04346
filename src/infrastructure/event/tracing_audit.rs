use crate::application::ports::audit::{AuditKind, AuditLog};
use crate::domain::value_objects::{PostId, UserId};
use tracing::info;

/// 監査イベントを `audit` ターゲットの tracing イベントとして出力する
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn log_event(&self, kind: AuditKind, actor: UserId, post_id: PostId) {
        info!(
            target: "audit",
            kind = kind.as_str(),
            actor = %actor,
            post_id = %post_id,
            "audit event"
        );
    }
}
