use sqlx::SqlitePool;

/// Get a value by key.
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v))
}

/// Set a value (upsert).
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO kv (key, value, updated_ts) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_ts = excluded.updated_ts",
    )
    .bind(key)
    .bind(value)
    .bind(chrono::Utc::now().timestamp())
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a key. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM kv WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count keys sharing a prefix, e.g. `movie|` for cached lookups.
pub async fn count_prefix(pool: &SqlitePool, prefix: &str) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv WHERE substr(key, 1, ?) = ?")
        .bind(prefix.len() as i64)
        .bind(prefix)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
