//! Maintenance plans: the explicit list of independent single-key writes a lifecycle
//! transition fans out once the primary record's state flag is durable.
//!
//! Every op is either an increment (of a counter or of a score derived from one) or an
//! idempotent set-membership change, so concurrent plans land in any order.

use crate::domain::entities::{LifecycleState, Post, Topic, TopicScores, Transition};
use crate::domain::keys::{self, field};
use crate::domain::value_objects::CategoryId;

/// After incrementing a counter, move `member`'s score in `index` by the same delta.
///
/// Only an existing member is touched; a rescore never adds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rescore {
    pub index: String,
    pub member: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    AdjustCounter {
        key: String,
        field: String,
        delta: i64,
        rescore: Option<Rescore>,
    },
    AddToIndex {
        index: String,
        score: i64,
        member: String,
    },
    RemoveFromIndex {
        index: String,
        member: String,
    },
    DeleteRecord {
        key: String,
    },
}

impl IndexOp {
    pub fn target(&self) -> &str {
        match self {
            IndexOp::AdjustCounter { key, .. } | IndexOp::DeleteRecord { key } => key,
            IndexOp::AddToIndex { index, .. } | IndexOp::RemoveFromIndex { index, .. } => index,
        }
    }
}

/// Post context needed to fan out a post transition.
#[derive(Debug, Clone, Copy)]
pub struct PostCascade<'a> {
    pub post: &'a Post,
    pub category_id: CategoryId,
    pub topic_state: LifecycleState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenancePlan {
    ops: Vec<IndexOp>,
}

impl MaintenancePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[IndexOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn adjust(&mut self, key: impl Into<String>, field: &str, delta: i64) -> &mut Self {
        self.push_counter(key.into(), field, delta, None)
    }

    pub fn adjust_and_rescore(
        &mut self,
        key: impl Into<String>,
        field: &str,
        delta: i64,
        index: &str,
        member: impl Into<String>,
    ) -> &mut Self {
        let rescore = Rescore {
            index: index.to_string(),
            member: member.into(),
        };
        self.push_counter(key.into(), field, delta, Some(rescore))
    }

    pub fn add_to_index(
        &mut self,
        index: impl Into<String>,
        score: i64,
        member: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(IndexOp::AddToIndex {
            index: index.into(),
            score,
            member: member.into(),
        });
        self
    }

    pub fn remove_from_index(
        &mut self,
        index: impl Into<String>,
        member: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(IndexOp::RemoveFromIndex {
            index: index.into(),
            member: member.into(),
        });
        self
    }

    pub fn delete_record(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(IndexOp::DeleteRecord { key: key.into() });
        self
    }

    fn push_counter(
        &mut self,
        key: String,
        field: &str,
        delta: i64,
        rescore: Option<Rescore>,
    ) -> &mut Self {
        if delta != 0 {
            self.ops.push(IndexOp::AdjustCounter {
                key,
                field: field.to_string(),
                delta,
                rescore,
            });
        }
        self
    }

    /// Counter and index writes for a post delete or restore.
    ///
    /// Purge yields an empty plan: post purge only gates physical deletion and leaves
    /// counter bookkeeping to the caller.
    pub fn for_post(cascade: PostCascade<'_>, transition: Transition) -> Self {
        let mut plan = Self::new();
        if transition == Transition::Purge {
            return plan;
        }

        let post = cascade.post;
        let delta = transition.counter_delta(post.state);
        let pid = post.id.to_string();
        let tid = post.topic_id.to_string();

        plan.adjust(keys::GLOBAL, keys::GLOBAL_POST_COUNT, delta);
        if cascade.topic_state.is_active() {
            plan.adjust_and_rescore(
                keys::topic(post.topic_id),
                field::POST_COUNT,
                delta,
                keys::TOPICS_POSTS,
                tid,
            );
        } else {
            plan.adjust(keys::topic(post.topic_id), field::POST_COUNT, delta);
        }
        plan.adjust_and_rescore(
            keys::user(post.user_id),
            field::POST_COUNT,
            delta,
            keys::USERS_POSTCOUNT,
            post.user_id.to_string(),
        );
        plan.adjust(
            keys::category(cascade.category_id),
            keys::CATEGORY_POST_COUNT,
            delta,
        );

        let recent_posts = keys::category_recent_posts(cascade.category_id);
        match transition {
            Transition::Delete => plan.remove_from_index(recent_posts, pid),
            _ => plan.add_to_index(recent_posts, post.timestamp, pid),
        };
        plan
    }

    /// Index and counter writes for a topic delete or restore.
    ///
    /// The post-count magnitude is the topic's stored `postcount` at this moment, a
    /// point-in-time snapshot rather than a recount of live posts.
    pub fn for_topic(topic: &Topic, transition: Transition) -> Self {
        let mut plan = Self::new();
        let tid = topic.id.to_string();

        match transition {
            Transition::Delete => {
                for index in keys::TOPIC_ORDERING_INDEXES {
                    plan.remove_from_index(index, tid.clone());
                }
            }
            Transition::Restore => {
                let scores = TopicScores::from(topic);
                plan.add_to_index(keys::TOPICS_RECENT, scores.recent, tid.clone())
                    .add_to_index(keys::TOPICS_POSTS, scores.posts, tid.clone())
                    .add_to_index(keys::TOPICS_VIEWS, scores.views, tid.clone());
            }
            Transition::Purge => return Self::for_topic_purge(topic),
        }

        let incr = transition.counter_delta(topic.state);
        let post_delta = incr * topic.post_count;
        let category = keys::category(topic.category_id);
        plan.adjust(keys::GLOBAL, keys::GLOBAL_TOPIC_COUNT, incr)
            .adjust(keys::GLOBAL, keys::GLOBAL_POST_COUNT, post_delta)
            .adjust(category.clone(), keys::CATEGORY_POST_COUNT, post_delta)
            .adjust(category, keys::CATEGORY_TOPIC_COUNT, incr);
        plan
    }

    /// Unconditional removal of every reference to a purged topic.
    pub fn for_topic_purge(topic: &Topic) -> Self {
        let mut plan = Self::new();
        let tid = topic.id.to_string();

        plan.delete_record(keys::topic_followers(topic.id))
            .delete_record(keys::topic_read_by(topic.id))
            .remove_from_index(keys::TOPICS_ALL, tid.clone());
        for index in keys::TOPIC_ORDERING_INDEXES {
            plan.remove_from_index(index, tid.clone());
        }
        plan.remove_from_index(keys::category_topics(topic.category_id), tid.clone())
            .remove_from_index(keys::user_topics(topic.user_id), tid);
        plan
    }

    /// Counter writes that follow a topic purge; empty when the topic was already
    /// deleted, since its delete has decremented them once.
    pub fn for_topic_purge_counters(topic: &Topic) -> Self {
        let mut plan = Self::new();
        let incr = Transition::Purge.counter_delta(topic.state);
        plan.adjust(
            keys::category(topic.category_id),
            keys::CATEGORY_TOPIC_COUNT,
            incr,
        )
        .adjust(keys::GLOBAL, keys::GLOBAL_TOPIC_COUNT, incr);
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{PostId, TopicId, UserId};

    fn sample_topic(state: LifecycleState) -> Topic {
        let mut topic = Topic::new(TopicId::new(1), CategoryId::new(2), UserId::new(3));
        topic.state = state;
        topic.post_count = 5;
        topic.view_count = 10;
        topic.last_post_time = 1_000;
        topic
    }

    fn counter(plan: &MaintenancePlan, key: &str, field_name: &str) -> Option<i64> {
        plan.ops().iter().find_map(|op| match op {
            IndexOp::AdjustCounter {
                key: k,
                field: f,
                delta,
                ..
            } if k == key && f == field_name => Some(*delta),
            _ => None,
        })
    }

    #[test]
    fn topic_delete_removes_indexes_and_decrements_snapshot() {
        let topic = sample_topic(LifecycleState::Active);
        let plan = MaintenancePlan::for_topic(&topic, Transition::Delete);

        let removals = plan
            .ops()
            .iter()
            .filter(|op| matches!(op, IndexOp::RemoveFromIndex { .. }))
            .count();
        assert_eq!(removals, 3);
        assert_eq!(counter(&plan, "global", "topicCount"), Some(-1));
        assert_eq!(counter(&plan, "global", "postCount"), Some(-5));
        assert_eq!(counter(&plan, "category:2", "post_count"), Some(-5));
        assert_eq!(counter(&plan, "category:2", "topic_count"), Some(-1));
    }

    #[test]
    fn topic_restore_scores_from_current_fields() {
        let topic = sample_topic(LifecycleState::Deleted);
        let plan = MaintenancePlan::for_topic(&topic, Transition::Restore);

        assert!(plan.ops().contains(&IndexOp::AddToIndex {
            index: "topics:views".into(),
            score: 10,
            member: "1".into(),
        }));
        assert!(plan.ops().contains(&IndexOp::AddToIndex {
            index: "topics:posts".into(),
            score: 5,
            member: "1".into(),
        }));
        assert_eq!(counter(&plan, "global", "postCount"), Some(5));
    }

    #[test]
    fn purge_counters_depend_on_starting_state() {
        let active = MaintenancePlan::for_topic_purge_counters(&sample_topic(LifecycleState::Active));
        assert_eq!(counter(&active, "category:2", "topic_count"), Some(-1));
        assert_eq!(counter(&active, "global", "topicCount"), Some(-1));

        let deleted =
            MaintenancePlan::for_topic_purge_counters(&sample_topic(LifecycleState::Deleted));
        assert!(deleted.is_empty());
    }

    #[test]
    fn topic_purge_touches_every_referencing_index() {
        let plan = MaintenancePlan::for_topic_purge(&sample_topic(LifecycleState::Deleted));
        let targets: Vec<&str> = plan.ops().iter().map(IndexOp::target).collect();
        for expected in [
            "tid:1:followers",
            "tid:1:read_by_uid",
            "topics:tid",
            "topics:recent",
            "topics:posts",
            "topics:views",
            "categories:2:tid",
            "uid:3:topics",
        ] {
            assert!(targets.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn post_delete_skips_topic_rescore_when_topic_deleted() {
        let post = Post::new(PostId::new(9), TopicId::new(1), UserId::new(3), "hi".into())
            .with_timestamp(500);
        let cascade = PostCascade {
            post: &post,
            category_id: CategoryId::new(2),
            topic_state: LifecycleState::Deleted,
        };
        let plan = MaintenancePlan::for_post(cascade, Transition::Delete);

        let topic_op = plan
            .ops()
            .iter()
            .find(|op| op.target() == "topic:1")
            .cloned();
        assert_eq!(
            topic_op,
            Some(IndexOp::AdjustCounter {
                key: "topic:1".into(),
                field: "postcount".into(),
                delta: -1,
                rescore: None,
            })
        );
        assert!(plan.ops().contains(&IndexOp::RemoveFromIndex {
            index: "categories:recent_posts:cid:2".into(),
            member: "9".into(),
        }));
    }

    #[test]
    fn post_purge_plans_nothing() {
        let post = Post::new(PostId::new(9), TopicId::new(1), UserId::new(3), "hi".into());
        let cascade = PostCascade {
            post: &post,
            category_id: CategoryId::new(2),
            topic_state: LifecycleState::Active,
        };
        assert!(MaintenancePlan::for_post(cascade, Transition::Purge).is_empty());
    }
}
