use crate::application::ports::store::KeyValueStore;
use crate::domain::plan::{IndexOp, MaintenancePlan};
use crate::shared::error::AppError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// 集計カウンタと順序インデックスを更新する唯一の経路
///
/// Holds no state of its own. Every write is one single-key primitive. Counters and
/// counter-derived scores move by increments, and membership changes are idempotent,
/// so callers may run them concurrently without a lock.
#[derive(Clone)]
pub struct SecondaryIndexMaintainer {
    store: Arc<dyn KeyValueStore>,
}

impl SecondaryIndexMaintainer {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn adjust_counter(&self, key: &str, field: &str, delta: i64) -> Result<(), AppError> {
        self.store.incr_field(key, field, delta).await.map(|_| ())
    }

    pub async fn add_to_index(&self, index: &str, score: i64, member: &str) -> Result<(), AppError> {
        self.store.sorted_set_add(index, score, member).await
    }

    pub async fn remove_from_index(&self, index: &str, member: &str) -> Result<(), AppError> {
        self.store.sorted_set_remove(index, member).await
    }

    pub async fn apply_op(&self, op: &IndexOp) -> Result<(), AppError> {
        match op {
            IndexOp::AdjustCounter {
                key,
                field,
                delta,
                rescore,
            } => {
                self.store.incr_field(key, field, *delta).await?;
                if let Some(rescore) = rescore {
                    self.store
                        .sorted_set_incr(&rescore.index, *delta, &rescore.member)
                        .await?;
                }
                Ok(())
            }
            IndexOp::AddToIndex {
                index,
                score,
                member,
            } => self.add_to_index(index, *score, member).await,
            IndexOp::RemoveFromIndex { index, member } => {
                self.remove_from_index(index, member).await
            }
            IndexOp::DeleteRecord { key } => self.store.delete_record(key).await,
        }
    }

    /// Runs every op of the plan concurrently and waits for all of them.
    ///
    /// A failed op does not cancel or undo its siblings.
    pub async fn apply(&self, plan: &MaintenancePlan) -> Result<(), AppError> {
        if plan.is_empty() {
            return Ok(());
        }

        let results = join_all(plan.ops().iter().map(|op| self.apply_op(op))).await;
        let outcomes = plan
            .ops()
            .iter()
            .map(|op| op.target().to_string())
            .zip(results)
            .collect();
        debug!(ops = plan.len(), "maintenance plan applied");
        settle(outcomes)
    }
}

/// ファンアウト結果をまとめる。失敗はすべてログに残し、最初の失敗を返す。
pub(crate) fn settle(outcomes: Vec<(String, Result<(), AppError>)>) -> Result<(), AppError> {
    let total = outcomes.len();
    let mut failures = outcomes
        .into_iter()
        .filter_map(|(target, result)| result.err().map(|err| (target, err)))
        .inspect(|(target, err)| warn!(key = %target, error = %err, "fan-out write failed"))
        .collect::<Vec<_>>();

    if failures.is_empty() {
        return Ok(());
    }

    let failed = failures.len();
    let (target, first) = failures.swap_remove(0);
    Err(AppError::Storage(format!(
        "{failed} of {total} writes failed without rollback; first at {target}: {first}"
    )))
}
