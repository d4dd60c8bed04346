use crate::domain::value_objects::{PostId, UserId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    PostDelete,
    PostRestore,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::PostDelete => "post-delete",
            AuditKind::PostRestore => "post-restore",
        }
    }
}

/// 監査ログの記録先
pub trait AuditLog: Send + Sync {
    fn log_event(&self, kind: AuditKind, actor: UserId, post_id: PostId);
}
