use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a selection save. `selected_albums` arrives as raw JSON and is
/// validated server side, matching what the settings page submits.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionRequest {
    #[schema(value_type = Object)]
    pub selected_albums: serde_json::Value,
}

/// One album the user can subscribe to, as shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableAlbum {
    /// Compound id, e.g. `photos_12`.
    pub id: String,
    pub name: String,
    pub source: String,
    pub shared: bool,
    pub selected: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub selected_albums: Vec<String>,
    pub available_albums: Vec<AvailableAlbum>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub email: String,
}
