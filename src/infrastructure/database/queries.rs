pub(super) const SELECT_FIELD: &str = r#"
    SELECT value
    FROM kv_records
    WHERE key = ?1 AND field = ?2
"#;

pub(super) const SELECT_RECORD: &str = r#"
    SELECT field, value
    FROM kv_records
    WHERE key = ?1
"#;

pub(super) const UPSERT_FIELD: &str = r#"
    INSERT INTO kv_records (key, field, value)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key, field) DO UPDATE SET value = excluded.value
"#;

pub(super) const UPDATE_FIELD_IF_EQUALS: &str = r#"
    UPDATE kv_records
    SET value = ?4
    WHERE key = ?1 AND field = ?2 AND value = ?3
"#;

pub(super) const INSERT_FIELD_IF_ABSENT: &str = r#"
    INSERT INTO kv_records (key, field, value)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key, field) DO NOTHING
"#;

pub(super) const INCREMENT_FIELD: &str = r#"
    INSERT INTO kv_records (key, field, value)
    VALUES (?1, ?2, CAST(?3 AS TEXT))
    ON CONFLICT(key, field) DO UPDATE
        SET value = CAST(CAST(kv_records.value AS INTEGER) + ?3 AS TEXT)
        WHERE kv_records.value = CAST(CAST(kv_records.value AS INTEGER) AS TEXT)
    RETURNING value
"#;

pub(super) const UPSERT_MEMBER: &str = r#"
    INSERT INTO kv_sorted_sets (key, member, score)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key, member) DO UPDATE SET score = excluded.score
"#;

pub(super) const INCREMENT_MEMBER_SCORE: &str = r#"
    UPDATE kv_sorted_sets
    SET score = score + ?3
    WHERE key = ?1 AND member = ?2
    RETURNING score
"#;

pub(super) const DELETE_MEMBER: &str = r#"
    DELETE FROM kv_sorted_sets
    WHERE key = ?1 AND member = ?2
"#;

pub(super) const SELECT_MEMBER_SCORE: &str = r#"
    SELECT score
    FROM kv_sorted_sets
    WHERE key = ?1 AND member = ?2
"#;

pub(super) const SELECT_MEMBERS_DESC: &str = r#"
    SELECT member
    FROM kv_sorted_sets
    WHERE key = ?1
    ORDER BY score DESC, member DESC
    LIMIT ?2 OFFSET ?3
"#;

pub(super) const COUNT_MEMBERS: &str = r#"
    SELECT COUNT(*) AS count
    FROM kv_sorted_sets
    WHERE key = ?1
"#;

pub(super) const DELETE_RECORD: &str = r#"
    DELETE FROM kv_records
    WHERE key = ?1
"#;

pub(super) const DELETE_SORTED_SET: &str = r#"
    DELETE FROM kv_sorted_sets
    WHERE key = ?1
"#;

pub(super) const KEY_EXISTS: &str = r#"
    SELECT EXISTS(SELECT 1 FROM kv_records WHERE key = ?1)
        OR EXISTS(SELECT 1 FROM kv_sorted_sets WHERE key = ?1) AS present
"#;
