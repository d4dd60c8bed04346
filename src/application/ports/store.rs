use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

/// キー単位でのみ原子性を持つキーバリューストアのポート
///
/// 複数キーにまたがるトランザクションは提供しない。レコード（フィールド→値）と
/// スコア付き集合の2種類のキーを扱う。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, AppError>;

    /// 指定フィールドのうち存在するものだけを返す
    async fn get_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, AppError>;

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), AppError>;

    async fn set_fields(&self, key: &str, fields: &[(&str, String)]) -> Result<(), AppError>;

    /// `expected` と一致した場合のみ書き込む。`None` はフィールド未設定を意味する。
    async fn compare_and_set_field(
        &self,
        key: &str,
        field: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, AppError>;

    /// フィールドを原子的に加算し、加算後の値を返す（未設定は0扱い）
    async fn incr_field(&self, key: &str, field: &str, delta: i64) -> Result<i64, AppError>;

    /// 既存メンバーの場合はスコアを更新する
    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError>;

    /// 存在しないメンバーの削除はエラーにしない
    async fn sorted_set_remove(&self, key: &str, member: &str) -> Result<(), AppError>;

    /// 既存メンバーのスコアだけを原子的に加算する。メンバーがいなければ何もせず `None`。
    async fn sorted_set_incr(
        &self,
        key: &str,
        delta: i64,
        member: &str,
    ) -> Result<Option<i64>, AppError>;

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<i64>, AppError>;

    /// スコア降順（同点はメンバー降順）で `offset` から最大 `limit` 件
    async fn sorted_set_rev_range(
        &self,
        key: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, AppError>;

    async fn sorted_set_card(&self, key: &str) -> Result<usize, AppError>;

    /// キー配下のレコード・集合を削除する
    async fn delete_record(&self, key: &str) -> Result<(), AppError>;

    async fn exists(&self, key: &str) -> Result<bool, AppError>;
}
