use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::BookingService;

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{devices, health, reservations, stats};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, service: Arc<BookingService>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        service,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // User routes: identity headers are required by the handlers'
    // extractors, so no separate auth layer is involved.
    let user_routes = Router::new()
        .route("/api/v1/devices", get(devices::list_devices))
        .route("/api/v1/devices/:device_id", get(devices::get_device))
        .route(
            "/api/v1/devices/:device_id/reservations",
            post(reservations::create_reservation),
        )
        .route(
            "/api/v1/devices/:device_id/reservation",
            delete(reservations::cancel_reservation),
        )
        .route(
            "/api/v1/reservations",
            get(reservations::list_my_reservations),
        )
        .route("/api/v1/stats", get(stats::get_stats));

    // Admin routes (require the admin role flag)
    let admin_routes = Router::new()
        .route("/api/v1/admin/devices", post(devices::register_device))
        .route(
            "/api/v1/admin/devices/:device_id",
            put(devices::update_device).delete(devices::remove_device),
        )
        .route(
            "/api/v1/admin/devices/:device_id/maintenance",
            put(devices::set_maintenance),
        );

    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
