use crate::api_state::ApiContext;
use crate::settings::handlers::{
    get_settings_handler, save_selection_handler, send_test_email_handler,
};
use axum::routing::{get, post};
use axum::Router;

pub fn settings_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/user/{user_id}/settings",
            get(get_settings_handler).put(save_selection_handler),
        )
        .route("/user/{user_id}/test-email", post(send_test_email_handler))
}
