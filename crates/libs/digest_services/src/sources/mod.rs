use crate::album_ref::SourceKind;
use crate::database::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

mod sql;

pub use sql::SqlAlbumSource;

/// A resolved album as seen from one user's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumInfo {
    pub name: String,
    pub owner_user_id: String,
    /// True when the requesting user got access through a share rather than
    /// ownership.
    pub is_shared: bool,
}

/// An album listed for the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedAlbum {
    pub local_id: String,
    pub name: String,
    pub is_shared: bool,
}

#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider app is not installed or its tables are missing. Treated
    /// as "no updates", never as a hard failure.
    #[error("Album source is not available")]
    Unavailable,

    #[error("Album source query failed: {0}")]
    Query(#[from] DbError),
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Query(err.into())
    }
}

/// One album provider (Photos or Memories). Implementations answer all
/// questions from the perspective of a single requesting user.
#[async_trait]
pub trait AlbumSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Resolves an album for a user, checking ownership first and share
    /// grants (direct, then via group) second. `Ok(None)` means the album
    /// does not exist or the user has no access.
    async fn resolve(
        &self,
        local_id: &str,
        requesting_user_id: &str,
    ) -> Result<Option<AlbumInfo>, SourceError>;

    /// Counts items added to the album at or after `cutoff`.
    async fn count_new_items(
        &self,
        local_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, SourceError>;

    /// Lists every album the user owns or has been granted access to.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ListedAlbum>, SourceError>;
}
