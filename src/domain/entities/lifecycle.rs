use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 投稿・トピックのライフサイクル状態
///
/// `Purged` は記録が物理削除された終端状態で、ストア上には現れない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Active,
    Deleted,
    Purged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Delete,
    Restore,
    Purge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("already deleted")]
    AlreadyDeleted,

    #[error("already active")]
    AlreadyActive,

    #[error("record has been purged")]
    Purged,
}

impl LifecycleState {
    /// Stored `deleted` field; a missing field means active.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some("1") => LifecycleState::Deleted,
            _ => LifecycleState::Active,
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            LifecycleState::Deleted => "1",
            LifecycleState::Active | LifecycleState::Purged => "0",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }

    /// 遷移表: 許可される遷移なら遷移後の状態を返す
    pub fn apply(self, transition: Transition) -> Result<LifecycleState, TransitionError> {
        match (self, transition) {
            (LifecycleState::Purged, _) => Err(TransitionError::Purged),
            (LifecycleState::Active, Transition::Delete) => Ok(LifecycleState::Deleted),
            (LifecycleState::Deleted, Transition::Delete) => Err(TransitionError::AlreadyDeleted),
            (LifecycleState::Deleted, Transition::Restore) => Ok(LifecycleState::Active),
            (LifecycleState::Active, Transition::Restore) => Err(TransitionError::AlreadyActive),
            (_, Transition::Purge) => Ok(LifecycleState::Purged),
        }
    }
}

impl Transition {
    /// Sign applied to every aggregate counter the transition touches.
    ///
    /// Purge of an active topic decrements its `topic_count` exactly once; purge of an
    /// already-deleted one touches nothing because the delete already did.
    pub fn counter_delta(self, from: LifecycleState) -> i64 {
        match (self, from) {
            (Transition::Delete, _) => -1,
            (Transition::Restore, _) => 1,
            (Transition::Purge, LifecycleState::Active) => -1,
            (Transition::Purge, _) => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Delete => "delete",
            Transition::Restore => "restore",
            Transition::Purge => "purge",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
