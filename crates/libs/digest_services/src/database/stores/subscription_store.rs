use crate::album_ref::{AlbumRef, decode_selection};
use crate::database::DbError;
use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

/// App id under which user selections are persisted in the host
/// `preferences` table.
pub const APP_ID: &str = "album_notifications";

/// Config key holding the JSON array of selected compound album ids.
pub const SELECTED_ALBUMS_KEY: &str = "selected_albums";

pub struct SubscriptionStore;

impl SubscriptionStore {
    /// Lists every user with a non-empty selection on file. A stored `''`
    /// and a stored `'[]'` both mean "not subscribed".
    pub async fn list_subscribed_users(
        executor: impl Executor<'_, Database = Postgres>,
    ) -> Result<Vec<String>, DbError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT userid
            FROM preferences
            WHERE appid = $1 AND configkey = $2
              AND configvalue <> '' AND configvalue <> '[]'
            ORDER BY userid
            "#,
        )
        .bind(APP_ID)
        .bind(SELECTED_ALBUMS_KEY)
        .fetch_all(executor)
        .await?)
    }

    /// Reads a user's selection. A missing or malformed value decodes to an
    /// empty selection; individual bad entries are dropped, never fatal.
    pub async fn get_selection(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
    ) -> Result<Vec<AlbumRef>, DbError> {
        let raw: Option<String> = sqlx::query_scalar(
            r#"
            SELECT configvalue
            FROM preferences
            WHERE userid = $1 AND appid = $2 AND configkey = $3
            "#,
        )
        .bind(user_id)
        .bind(APP_ID)
        .bind(SELECTED_ALBUMS_KEY)
        .fetch_optional(executor)
        .await?;

        Ok(raw.as_deref().map(decode_selection).unwrap_or_default())
    }

    /// Persists a validated selection. The only mutating operation; it runs
    /// on the settings path, never during a dispatch pass.
    pub async fn set_selection(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
        compound_ids: &[String],
    ) -> Result<(), DbError> {
        let value = serde_json::to_string(compound_ids)?;
        sqlx::query(
            r#"
            INSERT INTO preferences (userid, appid, configkey, configvalue)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (userid, appid, configkey)
            DO UPDATE SET configvalue = EXCLUDED.configvalue
            "#,
        )
        .bind(user_id)
        .bind(APP_ID)
        .bind(SELECTED_ALBUMS_KEY)
        .bind(value)
        .execute(executor)
        .await?;
        Ok(())
    }
}

/// Read side of the subscription store as the dispatcher sees it, so tests
/// can substitute a double.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    async fn list_subscribed_users(&self) -> Result<Vec<String>, DbError>;

    async fn selection(&self, user_id: &str) -> Result<Vec<AlbumRef>, DbError>;
}

pub struct DbSubscriptionReader {
    pool: PgPool,
}

impl DbSubscriptionReader {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionReader for DbSubscriptionReader {
    async fn list_subscribed_users(&self) -> Result<Vec<String>, DbError> {
        SubscriptionStore::list_subscribed_users(&self.pool).await
    }

    async fn selection(&self, user_id: &str) -> Result<Vec<AlbumRef>, DbError> {
        SubscriptionStore::get_selection(&self.pool, user_id).await
    }
}
