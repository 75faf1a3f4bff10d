//! PMO Suite Backend
//!
//! REST backend for projects, members and assignments with SQLite persistence.

mod api;
mod config;
mod db;
mod errors;
mod members;
mod models;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{MemberStore, Repository};
use members::MemberService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub members: Arc<MemberService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PMO Suite Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    if let Some(timeout) = config.op_timeout {
        tracing::info!("Member operation timeout: {:?}", timeout);
    }

    // Initialize database
    let pool = db::init_database(&config.db_path, config.max_connections).await?;

    if config.seed {
        db::seed::seed_if_empty(&pool).await?;
    }

    let state = AppState {
        repo: Arc::new(Repository::new(pool.clone())),
        members: Arc::new(
            MemberService::new(MemberStore::new(pool)).with_timeout(config.op_timeout),
        ),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Projects
        .route(
            "/projects",
            get(api::list_projects).post(api::create_project),
        )
        .route(
            "/projects/{id}",
            get(api::get_project)
                .put(api::update_project)
                .delete(api::delete_project),
        )
        // Members
        .route("/members", get(api::list_members).post(api::create_member))
        .route(
            "/members/{id}",
            get(api::get_member)
                .put(api::update_member)
                .delete(api::delete_member),
        )
        // Assignments
        .route(
            "/assignments",
            get(api::list_assignments).post(api::create_assignment),
        )
        .route(
            "/assignments/{id}",
            get(api::get_assignment)
                .put(api::update_assignment)
                .delete(api::delete_assignment),
        )
        // Position levels
        .route("/position-levels", get(api::list_position_levels));

    Router::new()
        .route("/", get(health_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Liveness endpoint.
async fn health_check() -> &'static str {
    "PMO Suite Server is running!"
}

#[cfg(test)]
mod tests;
