use autocatalog::{AppState, Config, config::LogFormat, migration::Migrator, router};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let json = matches!(format, LogFormat::Json);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autocatalog=info,tower_http=info,sea_orm=warn".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    tracing::debug!(?config, "Configuration loaded");
    if config.is_ephemeral_database() {
        tracing::warn!(
            database_url = %config.database_url,
            "Using an in-memory database, inventory and inquiries are lost on restart. Set DATABASE_URL to persist them"
        );
    }

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let bind_addr = config.bind_addr;
    let app = router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "Catalog API listening");
    tracing::info!("OpenAPI document at http://{bind_addr}/api/openapi.json");

    axum::serve(listener, app).await?;
    Ok(())
}
