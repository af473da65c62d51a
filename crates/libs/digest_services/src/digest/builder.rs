use crate::album_ref::{AlbumRef, SourceKind};
use crate::digest::{AlbumUpdate, Digest, Recipient};
use crate::sources::{AlbumSource, SourceError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Assembles per-user digests by querying each album provider for the
/// user's selected albums.
pub struct DigestBuilder {
    sources: Vec<Arc<dyn AlbumSource>>,
}

impl DigestBuilder {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn AlbumSource>>) -> Self {
        Self { sources }
    }

    fn source_for(&self, kind: SourceKind) -> Option<&Arc<dyn AlbumSource>> {
        self.sources.iter().find(|source| source.kind() == kind)
    }

    /// Builds the digest for one recipient, preserving the selection order.
    /// Albums that no longer resolve, whose provider is unavailable, or that
    /// have no new items since `cutoff` are left out. Returns `None` when
    /// nothing is left, so no empty mail ever goes out.
    pub async fn build(
        &self,
        recipient: Recipient,
        cutoff: DateTime<Utc>,
        selection: &[AlbumRef],
    ) -> Option<Digest> {
        let mut updates = Vec::new();

        for album_ref in selection {
            let Some(source) = self.source_for(album_ref.kind) else {
                debug!(album = %album_ref.compound_id(), "No source registered, skipping");
                continue;
            };

            let album = match source.resolve(&album_ref.local_id, &recipient.user_id).await {
                Ok(Some(album)) => album,
                Ok(None) => {
                    debug!(
                        user_id = %recipient.user_id,
                        album = %album_ref.compound_id(),
                        "Album no longer accessible, skipping"
                    );
                    continue;
                }
                Err(SourceError::Unavailable) => {
                    debug!(
                        album = %album_ref.compound_id(),
                        "Album source unavailable, skipping"
                    );
                    continue;
                }
                Err(err) => {
                    warn!(
                        album = %album_ref.compound_id(),
                        "Failed to resolve album: {err}"
                    );
                    continue;
                }
            };

            let count = match source.count_new_items(&album_ref.local_id, cutoff).await {
                Ok(count) => count,
                Err(err) => {
                    warn!(
                        album = %album_ref.compound_id(),
                        "Failed to count new items: {err}"
                    );
                    0
                }
            };
            if count == 0 {
                continue;
            }

            updates.push(AlbumUpdate {
                album,
                kind: album_ref.kind,
                new_item_count: count,
            });
        }

        if updates.is_empty() {
            return None;
        }
        let total_new_items = updates.iter().map(|update| update.new_item_count).sum();
        Some(Digest {
            recipient,
            updates,
            total_new_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSource;

    fn recipient() -> Recipient {
        Recipient {
            user_id: "alice".into(),
            display_name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    fn selection(ids: &[&str]) -> Vec<AlbumRef> {
        ids.iter().map(|id| AlbumRef::parse(id).unwrap()).collect()
    }

    #[tokio::test]
    async fn albums_without_updates_are_excluded() {
        let source = MockSource::new(SourceKind::Photos)
            .with_album("1", "Vacation", "alice", false, 3)
            .with_album("2", "Quiet", "alice", false, 0);
        let builder = DigestBuilder::new(vec![Arc::new(source)]);

        let digest = builder
            .build(recipient(), Utc::now(), &selection(&["photos_1", "photos_2"]))
            .await
            .unwrap();
        assert_eq!(digest.updates.len(), 1);
        assert_eq!(digest.updates[0].album.name, "Vacation");
        assert_eq!(digest.total_new_items, 3);
    }

    #[tokio::test]
    async fn empty_digest_is_none() {
        let source =
            MockSource::new(SourceKind::Photos).with_album("1", "Quiet", "alice", false, 0);
        let builder = DigestBuilder::new(vec![Arc::new(source)]);

        let digest = builder
            .build(recipient(), Utc::now(), &selection(&["photos_1", "photos_9"]))
            .await;
        assert_eq!(digest, None);
    }

    #[tokio::test]
    async fn selection_order_is_preserved_and_total_is_exact() {
        let photos = MockSource::new(SourceKind::Photos)
            .with_album("1", "Beach", "alice", false, 2)
            .with_album("2", "City", "bob", true, 5);
        let memories = MockSource::new(SourceKind::Memories).with_album("7", "Hike", "alice", false, 1);
        let builder = DigestBuilder::new(vec![Arc::new(photos), Arc::new(memories)]);

        let digest = builder
            .build(
                recipient(),
                Utc::now(),
                &selection(&["memories_7", "photos_2", "photos_1"]),
            )
            .await
            .unwrap();
        let names: Vec<&str> = digest
            .updates
            .iter()
            .map(|update| update.album.name.as_str())
            .collect();
        assert_eq!(names, vec!["Hike", "City", "Beach"]);
        assert_eq!(digest.total_new_items, 8);
    }

    #[tokio::test]
    async fn unavailable_source_contributes_nothing() {
        let photos = MockSource::new(SourceKind::Photos).with_album("1", "Beach", "alice", false, 2);
        let memories = MockSource::new(SourceKind::Memories).unavailable();
        let builder = DigestBuilder::new(vec![Arc::new(photos), Arc::new(memories)]);

        let digest = builder
            .build(
                recipient(),
                Utc::now(),
                &selection(&["memories_7", "photos_1"]),
            )
            .await
            .unwrap();
        assert_eq!(digest.updates.len(), 1);
        assert_eq!(digest.total_new_items, 2);
    }

    #[tokio::test]
    async fn failing_source_contributes_nothing() {
        let photos = MockSource::new(SourceKind::Photos).with_album("1", "Beach", "alice", false, 2);
        let memories = MockSource::new(SourceKind::Memories).failing();
        let builder = DigestBuilder::new(vec![Arc::new(photos), Arc::new(memories)]);

        let digest = builder
            .build(
                recipient(),
                Utc::now(),
                &selection(&["memories_7", "photos_1"]),
            )
            .await
            .unwrap();
        assert_eq!(digest.updates.len(), 1);
        assert_eq!(digest.updates[0].album.name, "Beach");
    }

    #[tokio::test]
    async fn build_is_deterministic() {
        let source = MockSource::new(SourceKind::Photos)
            .with_album("1", "Beach", "alice", false, 2)
            .with_album("2", "City", "bob", true, 5);
        let builder = DigestBuilder::new(vec![Arc::new(source)]);
        let cutoff = Utc::now();
        let refs = selection(&["photos_1", "photos_2"]);

        let first = builder.build(recipient(), cutoff, &refs).await;
        let second = builder.build(recipient(), cutoff, &refs).await;
        assert_eq!(first, second);
    }
}
