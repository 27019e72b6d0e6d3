use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use domain::services::BookingService;
use domain::BookingStore;
use persistence::{MemoryStore, PgStore};

mod app;
mod config;
mod error;
mod extractors;
mod jobs;
mod middleware;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!(
        "Starting Microwave Booking API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Select the storage backend
    let store: Arc<dyn BookingStore> = match config.database.driver.as_str() {
        "memory" => {
            info!("Using in-memory storage");
            if config.database.seed_sample_fleet {
                Arc::new(MemoryStore::with_sample_fleet())
            } else {
                Arc::new(MemoryStore::new())
            }
        }
        _ => {
            let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

            info!("Running database migrations...");
            sqlx::migrate!("../persistence/src/migrations")
                .run(&pool)
                .await?;
            info!("Migrations completed");

            Arc::new(PgStore::new(pool))
        }
    };

    // Hydrate the booking engine
    let service = Arc::new(BookingService::load(store).await?);

    // Start the expiry sweep
    let mut scheduler = jobs::JobScheduler::new();
    scheduler.register(jobs::ExpireReservationsJob::new(
        Arc::clone(&service),
        config.booking.expiry_sweep_secs,
    ));
    scheduler.start();

    // Build application
    let addr = config.socket_addr();
    let app = app::create_app(config, service);

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
