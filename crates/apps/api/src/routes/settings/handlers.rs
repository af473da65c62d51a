use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::{Path, State};
use digest_services::api::settings::error::SettingsError;
use digest_services::api::settings::interfaces::{
    SaveSelectionRequest, SettingsResponse, TestEmailResponse,
};
use digest_services::api::settings::service::{get_settings, save_selection, send_test_email};
use tracing::info;

/// Get a user's notification settings.
///
/// Returns the current album selection and every album the user could
/// subscribe to, across all installed providers.
#[utoipa::path(
    get,
    path = "/user/{user_id}/settings",
    tag = "Settings",
    params(
        ("user_id" = String, Path, description = "The host user id.")
    ),
    responses(
        (status = 200, description = "The user's settings.", body = SettingsResponse),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
pub async fn get_settings_handler(
    State(context): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsResponse>, SettingsError> {
    let settings = get_settings(&context.pool, &context.sources, &user_id).await?;
    Ok(Json(settings))
}

/// Save a user's album selection.
///
/// The body must carry a JSON array of compound album ids; anything else is
/// rejected with a 400.
#[utoipa::path(
    put,
    path = "/user/{user_id}/settings",
    tag = "Settings",
    params(
        ("user_id" = String, Path, description = "The host user id.")
    ),
    request_body = SaveSelectionRequest,
    responses(
        (status = 200, description = "Selection saved.", body = Vec<String>),
        (status = 400, description = "The selection is not a JSON array of strings."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
pub async fn save_selection_handler(
    State(context): State<ApiContext>,
    Path(user_id): Path<String>,
    Json(payload): Json<SaveSelectionRequest>,
) -> Result<Json<Vec<String>>, SettingsError> {
    info!("Save selection handler for user {user_id}");
    let saved = save_selection(&context.pool, &user_id, &payload.selected_albums).await?;
    Ok(Json(saved))
}

/// Send a test email to the user's configured address.
#[utoipa::path(
    post,
    path = "/user/{user_id}/test-email",
    tag = "Settings",
    params(
        ("user_id" = String, Path, description = "The host user id.")
    ),
    responses(
        (status = 200, description = "Test email sent.", body = TestEmailResponse),
        (status = 400, description = "The user has no email address on file."),
        (status = 404, description = "The user does not exist."),
        (status = 502, description = "The email could not be delivered."),
    )
)]
pub async fn send_test_email_handler(
    State(context): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<TestEmailResponse>, SettingsError> {
    let response =
        send_test_email(context.directory.as_ref(), context.mailer.as_ref(), &user_id).await?;
    Ok(Json(response))
}
