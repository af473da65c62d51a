use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use digest_services::directory::DbUserDirectory;
use digest_services::mailer::SmtpMailer;
use digest_services::sources::SqlAlbumSource;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn serve(pool: PgPool, settings: AppSettings) -> Result<()> {
    info!("🚀 Initializing server...");
    let api_state = ApiContext {
        pool: pool.clone(),
        sources: vec![
            Arc::new(SqlAlbumSource::photos(pool.clone())),
            Arc::new(SqlAlbumSource::memories(pool.clone())),
        ],
        directory: Arc::new(DbUserDirectory::new(pool)),
        mailer: Arc::new(SmtpMailer::from_settings(&settings)?),
        settings: settings.clone(),
    };

    let app = create_router(api_state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🐸 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
