use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;
use tracing::warn;
use utoipa::ToSchema;

/// One of the external album providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Photos,
    Memories,
}

impl SourceKind {
    /// Prefix used in compound album ids, e.g. `photos_12`.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Photos => "photos_",
            Self::Memories => "memories_",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Photos => "Photos",
            Self::Memories => "Memories",
        };
        f.write_str(s)
    }
}

/// A parsed (source, local-id) pair extracted from a compound identifier
/// string like `photos_12` or `memories_4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumRef {
    pub kind: SourceKind,
    pub local_id: String,
}

impl AlbumRef {
    /// Parses a compound id. Unknown prefixes and empty local ids yield
    /// `None`; callers drop those silently.
    #[must_use]
    pub fn parse(compound_id: &str) -> Option<Self> {
        for kind in [SourceKind::Photos, SourceKind::Memories] {
            if let Some(local_id) = compound_id.strip_prefix(kind.prefix())
                && !local_id.is_empty()
            {
                return Some(Self {
                    kind,
                    local_id: local_id.to_owned(),
                });
            }
        }
        None
    }

    #[must_use]
    pub fn compound_id(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.local_id)
    }
}

/// Decodes a persisted selection value (a JSON array of compound id strings)
/// into album refs. Never fails: an empty or malformed value decodes to an
/// empty selection, and individual entries that do not parse are dropped.
/// Stored order is preserved; duplicates are removed.
#[must_use]
pub fn decode_selection(raw: &str) -> Vec<AlbumRef> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let ids: Vec<String> = match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(err) => {
            warn!("ignoring malformed album selection: {err}");
            return Vec::new();
        }
    };

    let mut selection: Vec<AlbumRef> = Vec::with_capacity(ids.len());
    for id in &ids {
        match AlbumRef::parse(id) {
            Some(album_ref) if !selection.contains(&album_ref) => selection.push(album_ref),
            Some(_) => {}
            None => warn!("dropping unrecognized album id {id:?} from selection"),
        }
    }
    selection
}
