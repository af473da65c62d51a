use crate::album_ref::SourceKind;
use crate::sources::{AlbumInfo, AlbumSource, ListedAlbum, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

const COLLABORATOR_USER: i32 = 0;
const COLLABORATOR_GROUP: i32 = 1;

/// Postgres error code for a missing table.
const UNDEFINED_TABLE: &str = "42P01";
/// Postgres error code for a missing column.
const UNDEFINED_COLUMN: &str = "42703";

/// Table layout of one provider app. Both providers use the same shape with
/// a different prefix.
struct ProviderSchema {
    app_id: &'static str,
    albums: &'static str,
    collaborators: &'static str,
    files: &'static str,
}

const PHOTOS_SCHEMA: ProviderSchema = ProviderSchema {
    app_id: "photos",
    albums: "photos_albums",
    collaborators: "photos_albums_collabs",
    files: "photos_albums_files",
};

const MEMORIES_SCHEMA: ProviderSchema = ProviderSchema {
    app_id: "memories",
    albums: "memories_albums",
    collaborators: "memories_albums_collabs",
    files: "memories_albums_files",
};

#[derive(Debug, sqlx::FromRow)]
struct AlbumRow {
    name: String,
    owner: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ListedRow {
    album_id: i64,
    name: String,
    owner: String,
}

/// Album provider backed by the host database tables of the Photos or
/// Memories app.
pub struct SqlAlbumSource {
    pool: PgPool,
    kind: SourceKind,
    schema: ProviderSchema,
}

impl SqlAlbumSource {
    #[must_use]
    pub fn photos(pool: PgPool) -> Self {
        Self {
            pool,
            kind: SourceKind::Photos,
            schema: PHOTOS_SCHEMA,
        }
    }

    #[must_use]
    pub fn memories(pool: PgPool) -> Self {
        Self {
            pool,
            kind: SourceKind::Memories,
            schema: MEMORIES_SCHEMA,
        }
    }

    async fn is_enabled(&self) -> Result<bool, SourceError> {
        let enabled: Option<String> = sqlx::query_scalar(
            r#"
            SELECT configvalue
            FROM appconfig
            WHERE appid = $1 AND configkey = 'enabled'
            "#,
        )
        .bind(self.schema.app_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_source_err)?;

        Ok(enabled.as_deref() == Some("yes"))
    }

    async fn fetch_owned(
        &self,
        album_id: i64,
        user_id: &str,
    ) -> Result<Option<AlbumRow>, SourceError> {
        let query = format!(
            r#"
            SELECT name, "user" AS owner
            FROM {albums}
            WHERE album_id = $1 AND "user" = $2
            "#,
            albums = self.schema.albums,
        );
        sqlx::query_as::<_, AlbumRow>(&query)
            .bind(album_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_source_err)
    }

    async fn fetch_granted(
        &self,
        album_id: i64,
        user_id: &str,
        collaborator_type: i32,
    ) -> Result<Option<AlbumRow>, SourceError> {
        let query = if collaborator_type == COLLABORATOR_GROUP {
            format!(
                r#"
                SELECT a.name, a."user" AS owner
                FROM {albums} a
                JOIN {collabs} c ON c.album_id = a.album_id
                JOIN group_user g ON c.collaborator_id = g.gid
                WHERE a.album_id = $1 AND g.uid = $2 AND c.collaborator_type = $3
                LIMIT 1
                "#,
                albums = self.schema.albums,
                collabs = self.schema.collaborators,
            )
        } else {
            format!(
                r#"
                SELECT a.name, a."user" AS owner
                FROM {albums} a
                JOIN {collabs} c ON c.album_id = a.album_id
                WHERE a.album_id = $1 AND c.collaborator_id = $2 AND c.collaborator_type = $3
                LIMIT 1
                "#,
                albums = self.schema.albums,
                collabs = self.schema.collaborators,
            )
        };
        sqlx::query_as::<_, AlbumRow>(&query)
            .bind(album_id)
            .bind(user_id)
            .bind(collaborator_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_source_err)
    }
}

#[async_trait]
impl AlbumSource for SqlAlbumSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn resolve(
        &self,
        local_id: &str,
        requesting_user_id: &str,
    ) -> Result<Option<AlbumInfo>, SourceError> {
        if !self.is_enabled().await? {
            return Err(SourceError::Unavailable);
        }
        let Some(album_id) = parse_local_id(local_id) else {
            return Ok(None);
        };

        let owned = self.fetch_owned(album_id, requesting_user_id).await?;
        if owned.is_some() {
            return Ok(resolution_from(owned, None, requesting_user_id));
        }

        let mut granted = self
            .fetch_granted(album_id, requesting_user_id, COLLABORATOR_USER)
            .await?;
        if granted.is_none() {
            granted = self
                .fetch_granted(album_id, requesting_user_id, COLLABORATOR_GROUP)
                .await?;
        }
        Ok(resolution_from(None, granted, requesting_user_id))
    }

    async fn count_new_items(
        &self,
        local_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SourceError> {
        let Some(album_id) = parse_local_id(local_id) else {
            return Ok(0);
        };
        let cutoff_secs = cutoff.timestamp();

        let query = format!(
            "SELECT COUNT(*) FROM {files} WHERE album_id = $1 AND added_at >= $2",
            files = self.schema.files,
        );
        let counted = sqlx::query_scalar::<_, i64>(&query)
            .bind(album_id)
            .bind(cutoff_secs)
            .fetch_one(&self.pool)
            .await;

        let count = match counted {
            Ok(count) => count,
            Err(err) if is_pg_code(&err, UNDEFINED_COLUMN) => {
                // Older provider versions have no added_at column; fall back
                // to the file's modification time.
                debug!(
                    source = %self.kind,
                    "No added_at column, falling back to filecache mtime"
                );
                let fallback = format!(
                    r#"
                    SELECT COUNT(*)
                    FROM {files} f
                    JOIN filecache fc ON f.file_id = fc.fileid
                    WHERE f.album_id = $1 AND fc.mtime >= $2 AND fc.path LIKE 'files/%'
                    "#,
                    files = self.schema.files,
                );
                sqlx::query_scalar::<_, i64>(&fallback)
                    .bind(album_id)
                    .bind(cutoff_secs)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_source_err)?
            }
            Err(err) => return Err(map_source_err(err)),
        };

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ListedAlbum>, SourceError> {
        if !self.is_enabled().await? {
            return Err(SourceError::Unavailable);
        }
        let query = format!(
            r#"
            SELECT DISTINCT a.album_id, a.name, a."user" AS owner
            FROM {albums} a
            LEFT JOIN {collabs} c ON c.album_id = a.album_id
            LEFT JOIN group_user g
              ON c.collaborator_type = $2 AND c.collaborator_id = g.gid
            WHERE a."user" = $1
               OR (c.collaborator_type = $3 AND c.collaborator_id = $1)
               OR g.uid = $1
            ORDER BY a.name
            "#,
            albums = self.schema.albums,
            collabs = self.schema.collaborators,
        );
        let rows = sqlx::query_as::<_, ListedRow>(&query)
            .bind(user_id)
            .bind(COLLABORATOR_GROUP)
            .bind(COLLABORATOR_USER)
            .fetch_all(&self.pool)
            .await
            .map_err(map_source_err)?;

        Ok(rows
            .into_iter()
            .map(|row| ListedAlbum {
                local_id: row.album_id.to_string(),
                name: display_name(&row.name),
                is_shared: row.owner != user_id,
            })
            .collect())
    }
}

/// Album ids are numeric in both provider schemas; anything else cannot
/// match a row.
fn parse_local_id(local_id: &str) -> Option<i64> {
    local_id.parse().ok()
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "Unnamed Album".to_string()
    } else {
        name.to_string()
    }
}

/// Ownership wins over a grant; a grant marks the album as shared.
fn resolution_from(
    owned: Option<AlbumRow>,
    granted: Option<AlbumRow>,
    requesting_user_id: &str,
) -> Option<AlbumInfo> {
    if let Some(row) = owned {
        debug_assert_eq!(row.owner, requesting_user_id);
        return Some(AlbumInfo {
            name: display_name(&row.name),
            owner_user_id: row.owner,
            is_shared: false,
        });
    }
    granted.map(|row| AlbumInfo {
        name: display_name(&row.name),
        owner_user_id: row.owner,
        is_shared: true,
    })
}

fn is_pg_code(err: &sqlx::Error, code: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(code)
    )
}

fn map_source_err(err: sqlx::Error) -> SourceError {
    if is_pg_code(&err, UNDEFINED_TABLE) {
        SourceError::Unavailable
    } else {
        err.into()
    }
}
