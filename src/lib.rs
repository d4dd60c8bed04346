//! Content lifecycle engine for a discussion forum: soft delete, restore and purge of
//! posts and topics, with the aggregate counters and ordering indexes that derive from
//! them kept in step through single-key atomic writes.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use state::AppState;

/// ログ設定の初期化
///
/// `RUST_LOG` が無ければ `forum_lifecycle=debug,info` を使う。二重初期化はエラーにせず無視する。
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_lifecycle=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
