use app_state::AppSettings;
use axum::extract::FromRef;
use digest_services::directory::UserDirectory;
use digest_services::mailer::DigestMailer;
use digest_services::sources::AlbumSource;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub sources: Vec<Arc<dyn AlbumSource>>,
    pub directory: Arc<dyn UserDirectory>,
    pub mailer: Arc<dyn DigestMailer>,
}

// These impls allow Axum to extract parts of the state directly, for
// handlers that only need one piece.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
