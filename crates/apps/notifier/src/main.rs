use app_state::load_app_settings;
use color_eyre::Result;
use digest_services::database::get_db_pool;
use notifier::runner::run_notifications;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = load_app_settings()?;
    let level = Level::from_str(&settings.logging.level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let pool = get_db_pool(&settings.secrets.database_url).await?;
    run_notifications(pool, settings).await?;

    Ok(())
}
