mod api_doc;
pub mod root;
pub mod settings;

use crate::api_state::ApiContext;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::settings::router::settings_router;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(root_public_router())
        .merge(settings_router())
        .with_state(api_state)
}
