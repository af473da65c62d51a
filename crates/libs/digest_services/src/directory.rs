use crate::database::{AccountStore, DbError, UserAccount};
use async_trait::async_trait;
use sqlx::PgPool;

/// Lookup of host accounts, behind a trait so dispatch can be exercised
/// without a database.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup(&self, user_id: &str) -> Result<Option<UserAccount>, DbError>;
}

pub struct DbUserDirectory {
    pool: PgPool,
}

impl DbUserDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for DbUserDirectory {
    async fn lookup(&self, user_id: &str) -> Result<Option<UserAccount>, DbError> {
        AccountStore::find_account(&self.pool, user_id).await
    }
}
