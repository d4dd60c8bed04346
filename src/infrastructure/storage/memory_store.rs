use crate::application::ports::store::KeyValueStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    records: HashMap<String, HashMap<String, String>>,
    sorted_sets: HashMap<String, HashMap<String, i64>>,
}

/// メモリ上のキーバリューストア
///
/// 1操作ごとにロックを取るため単一キー操作は原子的。複数キーの一貫性は保証しない。
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_counter(key: &str, field: &str, raw: Option<&String>) -> Result<i64, AppError> {
    match raw {
        None => Ok(0),
        Some(value) => value.trim().parse::<i64>().map_err(|_| {
            AppError::Storage(format!("{key}.{field} is not an integer: {value:?}"))
        }),
    }
}

fn overflow(key: &str, field: &str) -> AppError {
    AppError::Storage(format!("{key}.{field} overflowed"))
}

fn rev_order(a: &(&String, &i64), b: &(&String, &i64)) -> Ordering {
    b.1.cmp(a.1).then_with(|| b.0.cmp(a.0))
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .get(key)
            .and_then(|record| record.get(field))
            .cloned())
    }

    async fn get_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, AppError> {
        let state = self.state.read().await;
        let Some(record) = state.records.get(key) else {
            return Ok(HashMap::new());
        };

        Ok(fields
            .iter()
            .filter_map(|field| {
                record
                    .get(*field)
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect())
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state
            .records
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, String)]) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let record = state.records.entry(key.to_string()).or_default();
        for (field, value) in fields {
            record.insert(field.to_string(), value.clone());
        }
        Ok(())
    }

    async fn compare_and_set_field(
        &self,
        key: &str,
        field: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let record = state.records.entry(key.to_string()).or_default();
        if record.get(field).map(String::as_str) != expected {
            return Ok(false);
        }
        record.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn incr_field(&self, key: &str, field: &str, delta: i64) -> Result<i64, AppError> {
        let mut state = self.state.write().await;
        let record = state.records.entry(key.to_string()).or_default();
        let next = parse_counter(key, field, record.get(field))?
            .checked_add(delta)
            .ok_or_else(|| overflow(key, field))?;
        record.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state
            .sorted_sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn sorted_set_remove(&self, key: &str, member: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if let Some(set) = state.sorted_sets.get_mut(key) {
            set.remove(member);
            if set.is_empty() {
                state.sorted_sets.remove(key);
            }
        }
        Ok(())
    }

    async fn sorted_set_incr(
        &self,
        key: &str,
        delta: i64,
        member: &str,
    ) -> Result<Option<i64>, AppError> {
        let mut state = self.state.write().await;
        let Some(score) = state
            .sorted_sets
            .get_mut(key)
            .and_then(|set| set.get_mut(member))
        else {
            return Ok(None);
        };
        *score = score.checked_add(delta).ok_or_else(|| overflow(key, member))?;
        Ok(Some(*score))
    }

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<i64>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .sorted_sets
            .get(key)
            .and_then(|set| set.get(member))
            .copied())
    }

    async fn sorted_set_rev_range(
        &self,
        key: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, AppError> {
        let state = self.state.read().await;
        let Some(set) = state.sorted_sets.get(key) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<(&String, &i64)> = set.iter().collect();
        entries.sort_by(rev_order);
        Ok(entries
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(member, _)| member.clone())
            .collect())
    }

    async fn sorted_set_card(&self, key: &str) -> Result<usize, AppError> {
        let state = self.state.read().await;
        Ok(state.sorted_sets.get(key).map_or(0, HashMap::len))
    }

    async fn delete_record(&self, key: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.records.remove(key);
        state.sorted_sets.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.records.contains_key(key) || state.sorted_sets.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_incr_field_starts_from_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.incr_field("global", "postCount", 3).await.unwrap(), 3);
        assert_eq!(store.incr_field("global", "postCount", -1).await.unwrap(), 2);
        assert_eq!(
            store.get_field("global", "postCount").await.unwrap(),
            Some("2".to_string())
        );
    }

    #[tokio::test]
    async fn test_incr_field_rejects_non_numeric() {
        let store = InMemoryStore::new();
        store.set_field("topic:1", "postcount", "many").await.unwrap();
        let result = store.incr_field("topic:1", "postcount", 1).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_incr_field_overflow_leaves_value_untouched() {
        let store = InMemoryStore::new();
        store
            .set_field("global", "postCount", &i64::MAX.to_string())
            .await
            .unwrap();
        let result = store.incr_field("global", "postCount", 1).await;
        assert!(matches!(result, Err(AppError::Storage(ref msg)) if msg.contains("overflowed")));
        assert_eq!(
            store.get_field("global", "postCount").await.unwrap(),
            Some(i64::MAX.to_string())
        );
    }

    #[tokio::test]
    async fn test_sorted_set_incr_only_touches_existing_members() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.sorted_set_incr("topics:posts", 1, "7").await.unwrap(),
            None
        );
        assert!(!store.exists("topics:posts").await.unwrap());

        store.sorted_set_add("topics:posts", 3, "7").await.unwrap();
        assert_eq!(
            store.sorted_set_incr("topics:posts", -2, "7").await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.sorted_set_score("topics:posts", "7").await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_sorted_set_add_is_idempotent_and_updates_score() {
        let store = InMemoryStore::new();
        store.sorted_set_add("topics:posts", 1, "7").await.unwrap();
        store.sorted_set_add("topics:posts", 4, "7").await.unwrap();
        assert_eq!(store.sorted_set_card("topics:posts").await.unwrap(), 1);
        assert_eq!(
            store.sorted_set_score("topics:posts", "7").await.unwrap(),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_sorted_set_remove_missing_member_is_noop() {
        let store = InMemoryStore::new();
        store.sorted_set_remove("topics:recent", "99").await.unwrap();
        assert!(!store.exists("topics:recent").await.unwrap());
    }

    #[tokio::test]
    async fn test_rev_range_orders_by_score_then_member() {
        let store = InMemoryStore::new();
        store.sorted_set_add("tid:1:posts", 10, "1").await.unwrap();
        store.sorted_set_add("tid:1:posts", 30, "3").await.unwrap();
        store.sorted_set_add("tid:1:posts", 30, "4").await.unwrap();
        store.sorted_set_add("tid:1:posts", 20, "2").await.unwrap();

        let all = store.sorted_set_rev_range("tid:1:posts", 0, 10).await.unwrap();
        assert_eq!(all, vec!["4", "3", "2", "1"]);
        let page = store.sorted_set_rev_range("tid:1:posts", 1, 2).await.unwrap();
        assert_eq!(page, vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_compare_and_set_field() {
        let store = InMemoryStore::new();
        assert!(store
            .compare_and_set_field("post:1", "deleted", None, "1")
            .await
            .unwrap());
        assert!(!store
            .compare_and_set_field("post:1", "deleted", Some("0"), "1")
            .await
            .unwrap());
        assert!(store
            .compare_and_set_field("post:1", "deleted", Some("1"), "0")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_record_removes_both_kinds() {
        let store = InMemoryStore::new();
        store.set_field("topic:1", "tid", "1").await.unwrap();
        store.sorted_set_add("topic:1", 1, "x").await.unwrap();
        store.delete_record("topic:1").await.unwrap();
        assert!(!store.exists("topic:1").await.unwrap());
        assert_eq!(store.sorted_set_card("topic:1").await.unwrap(), 0);
        assert_eq!(store.get_field("topic:1", "tid").await.unwrap(), None);
    }
}
