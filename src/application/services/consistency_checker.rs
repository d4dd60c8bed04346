use super::record_repository::RecordRepository;
use crate::application::ports::KeyValueStore;
use crate::domain::entities::{Topic, TopicScores};
use crate::domain::keys;
use crate::domain::value_objects::{CategoryId, TopicId};
use crate::shared::error::AppError;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// 集計値・インデックスと実レコードの食い違い
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    GlobalCounter {
        field: String,
        stored: i64,
        expected: i64,
    },
    CategoryCounter {
        category_id: CategoryId,
        field: String,
        stored: i64,
        expected: i64,
    },
    /// Topic presence in an ordering index disagrees with its state.
    IndexMembership {
        topic_id: TopicId,
        index: String,
        present: bool,
    },
    IndexScore {
        topic_id: TopicId,
        index: String,
        stored: i64,
        expected: i64,
    },
    /// A reference left behind by a topic that no longer has a record.
    Lingering { topic_id: TopicId, key: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub topics_checked: usize,
    pub drifts: Vec<Drift>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.drifts.is_empty()
    }
}

#[derive(Default)]
struct Tally {
    topics: i64,
    posts: i64,
}

/// Read-only reconciliation pass over topics and their aggregates.
///
/// Expected values are derived from topic records alone: for every aggregate, the
/// topic count is the number of active topics and the post count is the sum of their
/// stored post-counts.
pub struct ConsistencyChecker {
    records: RecordRepository,
}

impl ConsistencyChecker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: RecordRepository::new(store),
        }
    }

    pub async fn check(&self) -> Result<ConsistencyReport, AppError> {
        let mut report = ConsistencyReport::default();
        let mut global = Tally::default();
        let mut categories: BTreeMap<CategoryId, Tally> = BTreeMap::new();
        let mut known = HashSet::new();

        for topic_id in self.records.all_topic_ids().await? {
            known.insert(topic_id.to_string());
            let Some(topic) = self.records.get_topic(topic_id).await? else {
                report.drifts.push(Drift::Lingering {
                    topic_id,
                    key: keys::TOPICS_ALL.to_string(),
                });
                continue;
            };
            report.topics_checked += 1;

            let tally = categories.entry(topic.category_id).or_default();
            if topic.is_active() {
                global.topics += 1;
                global.posts += topic.post_count;
                tally.topics += 1;
                tally.posts += topic.post_count;
            }
            self.check_indexes(&topic, &mut report.drifts).await?;
        }

        self.check_unknown_members(&known, &mut report.drifts).await?;

        let stored = self.records.get_global().await?;
        for (field, stored, expected) in [
            (keys::GLOBAL_TOPIC_COUNT, stored.topic_count, global.topics),
            (keys::GLOBAL_POST_COUNT, stored.post_count, global.posts),
        ] {
            if stored != expected {
                report.drifts.push(Drift::GlobalCounter {
                    field: field.to_string(),
                    stored,
                    expected,
                });
            }
        }

        for (category_id, tally) in categories {
            let stored = self.records.get_category(category_id).await?;
            for (field, stored, expected) in [
                (keys::CATEGORY_TOPIC_COUNT, stored.topic_count, tally.topics),
                (keys::CATEGORY_POST_COUNT, stored.post_count, tally.posts),
            ] {
                if stored != expected {
                    report.drifts.push(Drift::CategoryCounter {
                        category_id,
                        field: field.to_string(),
                        stored,
                        expected,
                    });
                }
            }
        }

        for drift in &report.drifts {
            warn!(?drift, "consistency drift");
        }
        debug!(
            topics = report.topics_checked,
            drifts = report.drifts.len(),
            "consistency check finished"
        );
        Ok(report)
    }

    /// Verifies that nothing still refers to a purged topic.
    pub async fn check_absent(&self, topic: &Topic) -> Result<Vec<Drift>, AppError> {
        let store = self.records.store();
        let tid = topic.id.to_string();
        let mut drifts = Vec::new();

        let mut indexes = vec![
            keys::TOPICS_ALL.to_string(),
            keys::category_topics(topic.category_id),
            keys::user_topics(topic.user_id),
        ];
        indexes.extend(keys::TOPIC_ORDERING_INDEXES.iter().map(|i| i.to_string()));
        for index in indexes {
            if store.sorted_set_score(&index, &tid).await?.is_some() {
                drifts.push(Drift::Lingering {
                    topic_id: topic.id,
                    key: index,
                });
            }
        }

        for key in [
            keys::topic(topic.id),
            keys::topic_followers(topic.id),
            keys::topic_read_by(topic.id),
            keys::topic_tags(topic.id),
        ] {
            if store.exists(&key).await? {
                drifts.push(Drift::Lingering {
                    topic_id: topic.id,
                    key,
                });
            }
        }
        Ok(drifts)
    }

    async fn check_indexes(&self, topic: &Topic, drifts: &mut Vec<Drift>) -> Result<(), AppError> {
        let store = self.records.store();
        let tid = topic.id.to_string();
        let scores = TopicScores::from(topic);

        for (index, expected) in [
            (keys::TOPICS_RECENT, scores.recent),
            (keys::TOPICS_POSTS, scores.posts),
            (keys::TOPICS_VIEWS, scores.views),
        ] {
            let stored = store.sorted_set_score(index, &tid).await?;
            match (topic.is_active(), stored) {
                (true, Some(stored)) if stored != expected => drifts.push(Drift::IndexScore {
                    topic_id: topic.id,
                    index: index.to_string(),
                    stored,
                    expected,
                }),
                (true, None) | (false, Some(_)) => drifts.push(Drift::IndexMembership {
                    topic_id: topic.id,
                    index: index.to_string(),
                    present: stored.is_some(),
                }),
                _ => {}
            }
        }
        Ok(())
    }

    async fn check_unknown_members(
        &self,
        known: &HashSet<String>,
        drifts: &mut Vec<Drift>,
    ) -> Result<(), AppError> {
        let store = self.records.store();
        for index in keys::TOPIC_ORDERING_INDEXES {
            let count = store.sorted_set_card(index).await?;
            for member in store.sorted_set_rev_range(index, 0, count).await? {
                if known.contains(&member) {
                    continue;
                }
                match member.parse::<TopicId>() {
                    Ok(topic_id) => drifts.push(Drift::Lingering {
                        topic_id,
                        key: index.to_string(),
                    }),
                    Err(err) => warn!(index, member = %member, error = %err, "unparsable index member"),
                }
            }
        }
        Ok(())
    }
}
