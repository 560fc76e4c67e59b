//! Visiotrain Server - Vision Therapy Platform Admin Backend

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visiotrain_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            format!("visiotrain_server={},tower_http=debug", config.logging.level).into()
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Visiotrain Server v{}", env!("CARGO_PKG_VERSION"));

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(config.store.clone());
    let services = Services::new(
        repository,
        config.identity.clone(),
        config.distributors.clone(),
    );

    tracing::info!(
        "Document store project: {}, identity project: {}",
        config.store.project_id,
        config.identity.project_id
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Users
        .route("/users", get(api::users::list_users))
        .route("/users/clinics", get(api::users::list_clinic_users))
        .route("/users/:id", get(api::users::get_user))
        // Statistics
        .route("/admin/statistics", post(api::stats::get_statistics))
        // Roles
        .route("/admin/roles", post(api::roles::set_admin_role))
        // Distributors
        .route("/distributors", get(api::distributors::list_distributors))
        .route("/distributors", post(api::distributors::create_distributor))
        .route("/distributors/:id", get(api::distributors::get_distributor))
        .route("/distributors/:id", put(api::distributors::update_distributor))
        .route(
            "/distributors/:id/email",
            put(api::distributors::change_distributor_email),
        )
        .route(
            "/distributors/:id/password",
            put(api::distributors::set_distributor_password),
        )
        .route(
            "/distributors/:id/promocodes",
            get(api::distributors::list_distributor_promocodes),
        )
        .route(
            "/distributors/:id/promocodes",
            post(api::distributors::attach_promocode),
        )
        // Promo codes
        .route("/promocodes", get(api::promocodes::list_promocodes))
        .route("/promocodes", post(api::promocodes::create_promocodes))
        .route("/promocodes/find", post(api::promocodes::find_promocode))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
