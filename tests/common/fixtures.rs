use forum_lifecycle::application::ports::KeyValueStore;
use forum_lifecycle::application::services::RecordRepository;
use forum_lifecycle::domain::entities::{Post, Topic};
use forum_lifecycle::domain::value_objects::{CategoryId, PostId, TopicId, UserId};
use std::sync::Arc;

/// Inserts a topic whose ordering scores are fixed so tests can assert exact values.
pub async fn seed_topic(
    records: &RecordRepository,
    tid: u64,
    cid: u64,
    uid: u64,
    view_count: i64,
) -> Topic {
    let mut topic = Topic::new(TopicId::new(tid), CategoryId::new(cid), UserId::new(uid));
    topic.view_count = view_count;
    topic.last_post_time = 0;
    records
        .insert_topic(&topic)
        .await
        .expect("failed to seed topic");
    topic
}

pub async fn seed_post(
    records: &RecordRepository,
    pid: u64,
    tid: u64,
    uid: u64,
    timestamp: i64,
) -> Post {
    let post = Post::new(
        PostId::new(pid),
        TopicId::new(tid),
        UserId::new(uid),
        format!("post <{pid}>\nbody"),
    )
    .with_timestamp(timestamp);
    records
        .insert_post(&post)
        .await
        .expect("failed to seed post");
    post
}

/// Topic `tid` in category `cid` with `count` replies by user `uid`, timestamps
/// `base + 1..=base + count`, and `view_count` views.
pub async fn seed_thread(
    records: &RecordRepository,
    tid: u64,
    cid: u64,
    uid: u64,
    count: u64,
    view_count: i64,
) -> Vec<Post> {
    seed_topic(records, tid, cid, uid, view_count).await;
    let base = tid * 1_000;
    let mut posts = Vec::new();
    for offset in 1..=count {
        let pid = base + offset;
        posts.push(seed_post(records, pid, tid, uid, (base + offset) as i64).await);
    }
    posts
}

pub fn repository(store: &Arc<dyn KeyValueStore>) -> RecordRepository {
    RecordRepository::new(Arc::clone(store))
}

pub async fn score(store: &Arc<dyn KeyValueStore>, index: &str, member: u64) -> Option<i64> {
    store
        .sorted_set_score(index, &member.to_string())
        .await
        .expect("score lookup failed")
}

pub async fn ordering_scores(store: &Arc<dyn KeyValueStore>, tid: u64) -> [Option<i64>; 3] {
    [
        score(store, "topics:recent", tid).await,
        score(store, "topics:posts", tid).await,
        score(store, "topics:views", tid).await,
    ]
}
