use app_state::AppSettings;
use color_eyre::Result;
use digest_services::database::DbSubscriptionReader;
use digest_services::digest::DigestBuilder;
use digest_services::directory::DbUserDirectory;
use digest_services::dispatch::NotificationDispatcher;
use digest_services::mailer::SmtpMailer;
use digest_services::sources::{AlbumSource, SqlAlbumSource};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Wires up the dispatcher against the host database and runs one digest
/// pass. Meant to be invoked by an external scheduler (cron, systemd timer)
/// at most once per digest window.
pub async fn run_notifications(pool: PgPool, settings: AppSettings) -> Result<()> {
    let sources: Vec<Arc<dyn AlbumSource>> = vec![
        Arc::new(SqlAlbumSource::photos(pool.clone())),
        Arc::new(SqlAlbumSource::memories(pool.clone())),
    ];

    let dispatcher = NotificationDispatcher::new(
        Arc::new(DbSubscriptionReader::new(pool.clone())),
        Arc::new(DbUserDirectory::new(pool)),
        DigestBuilder::new(sources),
        Arc::new(SmtpMailer::from_settings(&settings)?),
        settings.digest.window_hours,
    );

    let summary = dispatcher.run_once().await?;
    info!(
        processed = summary.users_processed,
        sent = summary.digests_sent,
        skipped = summary.users_skipped,
        failed = summary.users_failed,
        "Notification run complete"
    );
    Ok(())
}
