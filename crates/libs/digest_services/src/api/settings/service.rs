use crate::api::settings::error::SettingsError;
use crate::api::settings::interfaces::{AvailableAlbum, SettingsResponse, TestEmailResponse};
use crate::database::SubscriptionStore;
use crate::digest::Recipient;
use crate::directory::UserDirectory;
use crate::mailer::DigestMailer;
use crate::sources::{AlbumSource, SourceError};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, warn};

/// Validates a submitted selection: it must be a JSON array of strings.
/// Entry format is not checked here; unknown compound ids are dropped when
/// the selection is read back.
pub fn validate_selection(value: &serde_json::Value) -> Result<Vec<String>, SettingsError> {
    let entries = value
        .as_array()
        .ok_or_else(|| SettingsError::InvalidSelection("expected a JSON array".to_string()))?;
    entries
        .iter()
        .map(|entry| {
            entry.as_str().map(String::from).ok_or_else(|| {
                SettingsError::InvalidSelection("expected an array of strings".to_string())
            })
        })
        .collect()
}

pub async fn save_selection(
    pool: &PgPool,
    user_id: &str,
    value: &serde_json::Value,
) -> Result<Vec<String>, SettingsError> {
    let compound_ids = validate_selection(value)?;
    SubscriptionStore::set_selection(pool, user_id, &compound_ids).await?;
    Ok(compound_ids)
}

/// Current selection plus every album the user could subscribe to. A
/// provider that is not installed simply contributes no albums.
pub async fn get_settings(
    pool: &PgPool,
    sources: &[Arc<dyn AlbumSource>],
    user_id: &str,
) -> Result<SettingsResponse, SettingsError> {
    let selection = SubscriptionStore::get_selection(pool, user_id).await?;
    let selected_albums: Vec<String> = selection.iter().map(|r| r.compound_id()).collect();

    let mut available_albums = Vec::new();
    for source in sources {
        let listed = match source.list_for_user(user_id).await {
            Ok(listed) => listed,
            Err(SourceError::Unavailable) => {
                debug!(source = %source.kind(), "Album source unavailable");
                continue;
            }
            Err(err) => {
                warn!(source = %source.kind(), "Failed to list albums: {err}");
                continue;
            }
        };
        for album in listed {
            let id = format!("{}{}", source.kind().prefix(), album.local_id);
            available_albums.push(AvailableAlbum {
                selected: selected_albums.contains(&id),
                id,
                name: album.name,
                source: source.kind().to_string(),
                shared: album.is_shared,
            });
        }
    }

    Ok(SettingsResponse {
        selected_albums,
        available_albums,
    })
}

pub async fn send_test_email(
    directory: &dyn UserDirectory,
    mailer: &dyn DigestMailer,
    user_id: &str,
) -> Result<TestEmailResponse, SettingsError> {
    let account = directory
        .lookup(user_id)
        .await?
        .ok_or_else(|| SettingsError::UnknownUser(user_id.to_string()))?;
    let email = account
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .ok_or(SettingsError::NoEmailOnFile)?
        .to_string();

    let recipient = Recipient {
        user_id: account.user_id.clone(),
        display_name: account.display_name_or_id().to_string(),
        email: email.clone(),
    };
    mailer.send_test_email(&recipient).await?;
    Ok(TestEmailResponse { email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockDirectory, MockMailer};
    use serde_json::json;

    #[test]
    fn selection_must_be_an_array_of_strings() {
        assert_eq!(
            validate_selection(&json!(["photos_1", "memories_2"])).unwrap(),
            vec!["photos_1".to_string(), "memories_2".to_string()],
        );
        assert_eq!(validate_selection(&json!([])).unwrap(), Vec::<String>::new());

        assert!(matches!(
            validate_selection(&json!("photos_1")),
            Err(SettingsError::InvalidSelection(_)),
        ));
        assert!(matches!(
            validate_selection(&json!({"albums": []})),
            Err(SettingsError::InvalidSelection(_)),
        ));
        assert!(matches!(
            validate_selection(&json!(["photos_1", 7])),
            Err(SettingsError::InvalidSelection(_)),
        ));
    }

    #[tokio::test]
    async fn test_email_requires_a_known_user_with_address() {
        let directory = MockDirectory::new()
            .with_user("alice", Some("alice@example.com"))
            .with_user("bob", None);
        let mailer = MockMailer::new();

        let response = send_test_email(&directory, &mailer, "alice").await.unwrap();
        assert_eq!(response.email, "alice@example.com");

        assert!(matches!(
            send_test_email(&directory, &mailer, "bob").await,
            Err(SettingsError::NoEmailOnFile),
        ));
        assert!(matches!(
            send_test_email(&directory, &mailer, "ghost").await,
            Err(SettingsError::UnknownUser(_)),
        ));
    }
}
