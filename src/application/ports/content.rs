use crate::shared::error::AppError;
use async_trait::async_trait;

/// 投稿本文のマークアップ変換（復元時のみ使用）
#[async_trait]
pub trait ContentRenderer: Send + Sync {
    async fn render(&self, raw: &str) -> Result<String, AppError>;
}
