use crate::routes::{root, settings};
use digest_services::api::settings::interfaces::{
    AvailableAlbum, SaveSelectionRequest, SettingsResponse, TestEmailResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Settings handlers
        settings::handlers::get_settings_handler,
        settings::handlers::save_selection_handler,
        settings::handlers::send_test_email_handler,
    ),
    components(
        schemas(
            SaveSelectionRequest,
            AvailableAlbum,
            SettingsResponse,
            TestEmailResponse,
        ),
    ),
    tags(
        (name = "Settings", description = "Album subscription settings per user"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;
