use crate::album_ref::{AlbumRef, SourceKind, decode_selection};
use crate::database::{DbError, SubscriptionReader, UserAccount};
use crate::digest::{Digest, Recipient};
use crate::directory::UserDirectory;
use crate::mailer::{DigestMailer, MailError};
use crate::sources::{AlbumInfo, AlbumSource, ListedAlbum, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

struct MockAlbum {
    info: AlbumInfo,
    new_item_count: u64,
}

/// Album source double with a fixed set of albums.
pub struct MockSource {
    kind: SourceKind,
    albums: HashMap<String, MockAlbum>,
    unavailable: bool,
    failing: bool,
}

impl MockSource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            albums: HashMap::new(),
            unavailable: false,
            failing: false,
        }
    }

    pub fn with_album(
        mut self,
        local_id: &str,
        name: &str,
        owner: &str,
        is_shared: bool,
        new_item_count: u64,
    ) -> Self {
        self.albums.insert(
            local_id.to_string(),
            MockAlbum {
                info: AlbumInfo {
                    name: name.to_string(),
                    owner_user_id: owner.to_string(),
                    is_shared,
                },
                new_item_count,
            },
        );
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.unavailable {
            return Err(SourceError::Unavailable);
        }
        if self.failing {
            return Err(SourceError::Query(DbError::Sqlx(sqlx::Error::PoolClosed)));
        }
        Ok(())
    }
}

#[async_trait]
impl AlbumSource for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn resolve(
        &self,
        local_id: &str,
        _requesting_user_id: &str,
    ) -> Result<Option<AlbumInfo>, SourceError> {
        self.check()?;
        Ok(self.albums.get(local_id).map(|album| album.info.clone()))
    }

    async fn count_new_items(
        &self,
        local_id: &str,
        _cutoff: DateTime<Utc>,
    ) -> Result<u64, SourceError> {
        self.check()?;
        Ok(self
            .albums
            .get(local_id)
            .map_or(0, |album| album.new_item_count))
    }

    async fn list_for_user(&self, _user_id: &str) -> Result<Vec<ListedAlbum>, SourceError> {
        self.check()?;
        let mut listed: Vec<ListedAlbum> = self
            .albums
            .iter()
            .map(|(local_id, album)| ListedAlbum {
                local_id: local_id.clone(),
                name: album.info.name.clone(),
                is_shared: album.info.is_shared,
            })
            .collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }
}

/// Subscription reader double; preserves the order users were added in.
#[derive(Default)]
pub struct MockSubscriptions {
    users: Vec<(String, Vec<AlbumRef>)>,
}

impl MockSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, user_id: &str, compound_ids: &[&str]) -> Self {
        let raw = serde_json::to_string(compound_ids).unwrap();
        self.users
            .push((user_id.to_string(), decode_selection(&raw)));
        self
    }
}

#[async_trait]
impl SubscriptionReader for MockSubscriptions {
    async fn list_subscribed_users(&self) -> Result<Vec<String>, DbError> {
        Ok(self
            .users
            .iter()
            .filter(|(_, selection)| !selection.is_empty())
            .map(|(user_id, _)| user_id.clone())
            .collect())
    }

    async fn selection(&self, user_id: &str) -> Result<Vec<AlbumRef>, DbError> {
        Ok(self
            .users
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, selection)| selection.clone())
            .unwrap_or_default())
    }
}

/// User directory double.
#[derive(Default)]
pub struct MockDirectory {
    accounts: HashMap<String, UserAccount>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: &str, email: Option<&str>) -> Self {
        self.accounts.insert(
            user_id.to_string(),
            UserAccount {
                user_id: user_id.to_string(),
                display_name: None,
                email: email.map(String::from),
            },
        );
        self
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn lookup(&self, user_id: &str) -> Result<Option<UserAccount>, DbError> {
        Ok(self.accounts.get(user_id).cloned())
    }
}

/// Recording mailer double; can be told to fail for specific users.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<Digest>>,
    fail_for: HashSet<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, user_id: &str) -> Self {
        self.fail_for.insert(user_id.to_string());
        self
    }

    pub fn sent(&self) -> Vec<Digest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DigestMailer for MockMailer {
    async fn send_digest(&self, digest: &Digest) -> Result<(), MailError> {
        if self.fail_for.contains(&digest.recipient.user_id) {
            return Err(MailError::Delivery("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(digest.clone());
        Ok(())
    }

    async fn send_test_email(&self, recipient: &Recipient) -> Result<(), MailError> {
        if self.fail_for.contains(&recipient.user_id) {
            return Err(MailError::Delivery("connection refused".to_string()));
        }
        Ok(())
    }
}
