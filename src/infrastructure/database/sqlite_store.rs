use super::queries::{
    COUNT_MEMBERS, DELETE_MEMBER, DELETE_RECORD, DELETE_SORTED_SET, INCREMENT_FIELD,
    INCREMENT_MEMBER_SCORE, INSERT_FIELD_IF_ABSENT, KEY_EXISTS, SELECT_FIELD,
    SELECT_MEMBERS_DESC, SELECT_MEMBER_SCORE, SELECT_RECORD, UPDATE_FIELD_IF_EQUALS,
    UPSERT_FIELD, UPSERT_MEMBER,
};
use super::ConnectionPool;
use crate::application::ports::store::KeyValueStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;

/// SQLite 上のキーバリューストア
///
/// 各操作は単一の文（または同一キーだけを触るトランザクション）で完結する。
pub struct SqliteStore {
    pool: ConnectionPool,
}

impl SqliteStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query(SELECT_FIELD)
            .bind(key)
            .bind(field)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn get_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, AppError> {
        let rows = sqlx::query(SELECT_RECORD)
            .bind(key)
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut values = HashMap::with_capacity(fields.len());
        for row in rows {
            let field: String = row.try_get("field")?;
            if fields.contains(&field.as_str()) {
                values.insert(field, row.try_get("value")?);
            }
        }
        Ok(values)
    }

    async fn set_field(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(UPSERT_FIELD)
            .bind(key)
            .bind(field)
            .bind(value)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn set_fields(&self, key: &str, fields: &[(&str, String)]) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        for (field, value) in fields {
            sqlx::query(UPSERT_FIELD)
                .bind(key)
                .bind(*field)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn compare_and_set_field(
        &self,
        key: &str,
        field: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, AppError> {
        let result = match expected {
            Some(expected) => {
                sqlx::query(UPDATE_FIELD_IF_EQUALS)
                    .bind(key)
                    .bind(field)
                    .bind(expected)
                    .bind(value)
                    .execute(self.pool.get_pool())
                    .await?
            }
            None => {
                sqlx::query(INSERT_FIELD_IF_ABSENT)
                    .bind(key)
                    .bind(field)
                    .bind(value)
                    .execute(self.pool.get_pool())
                    .await?
            }
        };
        Ok(result.rows_affected() == 1)
    }

    async fn incr_field(&self, key: &str, field: &str, delta: i64) -> Result<i64, AppError> {
        let row = sqlx::query(INCREMENT_FIELD)
            .bind(key)
            .bind(field)
            .bind(delta)
            .fetch_optional(self.pool.get_pool())
            .await?;

        // 既存値が整数でなければ更新されず行も返らない
        let Some(row) = row else {
            return Err(AppError::Storage(format!("{key}.{field} is not an integer")));
        };
        let raw: String = row.try_get("value")?;
        raw.parse::<i64>()
            .map_err(|_| AppError::Storage(format!("{key}.{field} is not an integer: {raw:?}")))
    }

    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), AppError> {
        sqlx::query(UPSERT_MEMBER)
            .bind(key)
            .bind(member)
            .bind(score)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn sorted_set_remove(&self, key: &str, member: &str) -> Result<(), AppError> {
        sqlx::query(DELETE_MEMBER)
            .bind(key)
            .bind(member)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn sorted_set_incr(
        &self,
        key: &str,
        delta: i64,
        member: &str,
    ) -> Result<Option<i64>, AppError> {
        let row = sqlx::query(INCREMENT_MEMBER_SCORE)
            .bind(key)
            .bind(member)
            .bind(delta)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("score")?)),
            None => Ok(None),
        }
    }

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<i64>, AppError> {
        let row = sqlx::query(SELECT_MEMBER_SCORE)
            .bind(key)
            .bind(member)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("score")?)),
            None => Ok(None),
        }
    }

    async fn sorted_set_rev_range(
        &self,
        key: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query(SELECT_MEMBERS_DESC)
            .bind(key)
            .bind(to_i64(limit))
            .bind(to_i64(offset))
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            members.push(row.try_get("member")?);
        }
        Ok(members)
    }

    async fn sorted_set_card(&self, key: &str) -> Result<usize, AppError> {
        let count: i64 = sqlx::query(COUNT_MEMBERS)
            .bind(key)
            .fetch_one(self.pool.get_pool())
            .await?
            .try_get("count")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn delete_record(&self, key: &str) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;
        sqlx::query(DELETE_RECORD)
            .bind(key)
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_SORTED_SET)
            .bind(key)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let present: i64 = sqlx::query(KEY_EXISTS)
            .bind(key)
            .fetch_one(self.pool.get_pool())
            .await?
            .try_get("present")?;
        Ok(present != 0)
    }
}
