use crate::album_ref::SourceKind;
use crate::sources::AlbumInfo;

/// The person a digest is addressed to. Only built once an email address is
/// known to be on file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

/// One album that received new items within the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumUpdate {
    pub album: AlbumInfo,
    pub kind: SourceKind,
    pub new_item_count: u64,
}

/// A complete digest for one user. Never empty: a user with no updates gets
/// no digest at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub recipient: Recipient,
    pub updates: Vec<AlbumUpdate>,
    pub total_new_items: u64,
}
