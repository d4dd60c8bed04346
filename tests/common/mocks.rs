use async_trait::async_trait;
use forum_lifecycle::application::ports::{
    AuditKind, AuditLog, KeyValueStore, LifecycleEvent, LifecycleHooks, PrivilegeChecker,
};
use forum_lifecycle::domain::value_objects::{PostId, UserId};
use forum_lifecycle::infrastructure::storage::InMemoryStore;
use forum_lifecycle::shared::error::AppError;
use mockall::mock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    pub Privileges {}

    #[async_trait]
    impl PrivilegeChecker for Privileges {
        async fn can_edit(&self, post_id: PostId, actor: UserId) -> Result<bool, AppError>;
    }
}

pub fn allow_all() -> MockPrivileges {
    let mut privileges = MockPrivileges::new();
    privileges.expect_can_edit().returning(|_, _| Ok(true));
    privileges
}

#[derive(Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingHooks {
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(LifecycleEvent::name)
            .collect()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl LifecycleHooks for RecordingHooks {
    fn fire(&self, event: LifecycleEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingAudit {
    entries: Mutex<Vec<(AuditKind, UserId, PostId)>>,
}

impl RecordingAudit {
    pub fn entries(&self) -> Vec<(AuditKind, UserId, PostId)> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuditLog for RecordingAudit {
    fn log_event(&self, kind: AuditKind, actor: UserId, post_id: PostId) {
        self.entries.lock().unwrap().push((kind, actor, post_id));
    }
}

/// In-memory store that rejects increments on chosen keys, can stall the next index
/// write on a key, and counts every write.
#[derive(Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    failing_keys: Mutex<Vec<String>>,
    index_delays: Mutex<HashMap<String, Duration>>,
    writes: Mutex<usize>,
}

impl FailingStore {
    /// The next score write on `key` sleeps for `delay` before landing.
    pub fn delay_next_index_write(&self, key: &str, delay: Duration) {
        self.index_delays
            .lock()
            .unwrap()
            .insert(key.to_string(), delay);
    }

    async fn stall(&self, key: &str) {
        let delay = self.index_delays.lock().unwrap().remove(key);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn fail_increments_on(&self, key: &str) {
        self.failing_keys.lock().unwrap().push(key.to_string());
    }

    pub fn heal(&self) {
        self.failing_keys.lock().unwrap().clear();
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn record_write(&self) {
        *self.writes.lock().unwrap() += 1;
    }

    fn check(&self, key: &str) -> Result<(), AppError> {
        if self.failing_keys.lock().unwrap().iter().any(|k| k == key) {
            return Err(AppError::Storage(format!("injected failure on {key}")));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        self.inner.get_field(key, field).await
    }

    async fn get_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, AppError> {
        self.inner.get_fields(key, fields).await
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        self.record_write();
        self.inner.set_field(key, field, value).await
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, String)]) -> Result<(), AppError> {
        self.record_write();
        self.inner.set_fields(key, fields).await
    }

    async fn compare_and_set_field(
        &self,
        key: &str,
        field: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, AppError> {
        self.record_write();
        self.inner
            .compare_and_set_field(key, field, expected, value)
            .await
    }

    async fn incr_field(&self, key: &str, field: &str, delta: i64) -> Result<i64, AppError> {
        self.record_write();
        self.check(key)?;
        self.inner.incr_field(key, field, delta).await
    }

    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError> {
        self.record_write();
        self.stall(key).await;
        self.inner.sorted_set_add(key, score, member).await
    }

    async fn sorted_set_remove(&self, key: &str, member: &str) -> Result<(), AppError> {
        self.record_write();
        self.inner.sorted_set_remove(key, member).await
    }

    async fn sorted_set_incr(
        &self,
        key: &str,
        delta: i64,
        member: &str,
    ) -> Result<Option<i64>, AppError> {
        self.record_write();
        self.stall(key).await;
        self.inner.sorted_set_incr(key, delta, member).await
    }

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<i64>, AppError> {
        self.inner.sorted_set_score(key, member).await
    }

    async fn sorted_set_rev_range(
        &self,
        key: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, AppError> {
        self.inner.sorted_set_rev_range(key, offset, limit).await
    }

    async fn sorted_set_card(&self, key: &str) -> Result<usize, AppError> {
        self.inner.sorted_set_card(key).await
    }

    async fn delete_record(&self, key: &str) -> Result<(), AppError> {
        self.record_write();
        self.inner.delete_record(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        self.inner.exists(key).await
    }
}

pub fn as_store<S: KeyValueStore + 'static>(store: &Arc<S>) -> Arc<dyn KeyValueStore> {
    Arc::clone(store) as Arc<dyn KeyValueStore>
}
