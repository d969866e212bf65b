//! api-page API server entry point.

use std::sync::Arc;

use apipage_core::clock::{Clock, SystemClock};
use apipage_events::domain::store::EventStore;
use apipage_events::memory::InMemoryEventStore;
use apipage_pages::domain::store::PageStore;
use apipage_pages::memory::InMemoryPageStore;
use apipage_realtime::hub::{Hub, HubConfig};
use apipage_store_pg::{PgEventStore, PgPageStore};
use sqlx::postgres::PgPoolOptions;

use apipage_api::config::AppConfig;
use apipage_api::error::AppError;
use apipage_api::state::AppState;
use apipage_api::{build_app, serve, shutdown_signal, telemetry};

async fn open_stores(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<(Arc<dyn PageStore>, Arc<dyn EventStore>), AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL is not set; records are kept in memory only");
        return Ok((
            Arc::new(InMemoryPageStore::new(Arc::clone(&clock))),
            Arc::new(InMemoryEventStore::new(clock)),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    apipage_store_pg::schema::MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok((
        Arc::new(PgPageStore::new(pool.clone(), Arc::clone(&clock))),
        Arc::new(PgEventStore::new(pool, clock)),
    ))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing .env file is fine; the environment may be set directly.
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(&config)?;

    tracing::info!("Starting api-page API server");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (page_store, event_store) = open_stores(&config, clock).await?;

    let (hub, hub_loop) = Hub::new(HubConfig {
        client_buffer: config.ws_client_buffer,
    });
    tokio::spawn(hub_loop.run());

    let app_state =
        AppState::new(page_store, event_store, hub).with_connection_config(config.ws_connection);
    let app = build_app(app_state, &config.base_path, config.static_dir.as_deref());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let served = serve(listener, app, shutdown_signal()).await;
    tracing::info!("server stopped");
    telemetry.shutdown();
    served?;

    Ok(())
}
