//! School Portal Backend
//!
//! Content service for a single-school website: one site document kept in a
//! local SQLite cache and mirrored to a remote JSON endpoint.

mod api;
mod auth;
mod config;
mod db;
mod editor;
mod errors;
mod media;
mod models;
mod state;
mod sync;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{SessionKind, SessionStore};
use config::Config;
use db::LocalStore;
use state::DocumentStore;
use sync::{PersistenceCoordinator, RemoteClient, RetryPolicy};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub coordinator: Arc<PersistenceCoordinator>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
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

    tracing::info!("Starting School Portal Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    match &config.remote_url {
        Some(url) => tracing::info!("Remote endpoint: {}", url),
        None => tracing::warn!("No remote endpoint configured (SCHOOL_REMOTE_URL). Saves stay local."),
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let local = LocalStore::new(pool);

    let remote = match &config.remote_url {
        Some(url) => Some(RemoteClient::new(url.clone(), config.remote_timeout)?),
        None => None,
    };

    let coordinator = Arc::new(PersistenceCoordinator::new(
        local,
        remote,
        config.online,
        RetryPolicy {
            attempts: config.remote_retries,
            base_delay: Duration::from_millis(config.remote_retry_base_ms),
        },
        config.payload_limit,
    ));

    // Load the document once; handlers read snapshots from here on
    let loaded = coordinator.load().await;
    tracing::info!(
        source = ?loaded.source,
        revision = loaded.document.revision,
        "Site document ready"
    );
    let store = Arc::new(DocumentStore::new(loaded.document));

    let state = AppState {
        store,
        coordinator,
        sessions: Arc::new(SessionStore::new()),
        config: Arc::new(config.clone()),
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

    let body_limit = state.config.max_body_bytes;
    let admin_sessions = state.sessions.clone();
    let office_sessions = state.sessions.clone();

    // Admin dashboard, admin session required
    let admin_routes = Router::new()
        .route("/session", get(api::get_admin_session))
        .route("/edit-mode", put(api::set_edit_mode))
        .route("/draft", get(api::get_draft))
        .route("/draft/commit", post(api::commit_draft))
        .route("/draft/discard", post(api::discard_draft))
        .route("/records/{kind}", get(api::list_records))
        .route("/records/{kind}", post(api::add_record))
        .route("/records/{kind}/{id}", put(api::update_record))
        .route("/records/{kind}/{id}", delete(api::delete_record))
        .route("/singletons/{field}", put(api::patch_singleton))
        .route("/singletons/{field}", delete(api::clear_singleton))
        .route("/blocks/{block}", put(api::patch_block))
        .route("/document", patch(api::patch_document))
        .route("/reset-code", post(api::regenerate_reset_code))
        .route("/connectivity", post(api::set_connectivity))
        .route("/media", post(api::upload_media))
        .route("/gallery/upload", post(api::upload_gallery))
        .route_layer(middleware::from_fn(move |req, next| {
            auth::require_session(admin_sessions.clone(), SessionKind::Admin, req, next)
        }));

    // Office resources, office session required
    let office_routes = Router::new()
        .route("/office-profiles", get(api::list_office_profiles))
        .route_layer(middleware::from_fn(move |req, next| {
            auth::require_session(office_sessions.clone(), SessionKind::Office, req, next)
        }));

    // Public API routes
    let api_routes = Router::new()
        .route("/site", get(api::get_site))
        .route("/pages/{page}", get(api::get_page))
        .route("/corner/filters", get(api::corner_filters))
        .route("/notices", get(api::list_notices))
        .route("/exams", get(api::list_exams))
        .route("/results", get(api::list_results))
        .route("/gallery", get(api::list_gallery))
        .route("/teachers", get(api::list_teachers))
        .route("/administration", get(api::get_administration))
        .route("/stats", get(api::get_stats))
        .route("/theme/toggle", post(api::toggle_theme))
        .route("/sync/status", get(api::sync_status))
        // Sessions
        .route("/auth/admin/login", post(api::admin_login))
        .route("/auth/office/login", post(api::office_login))
        .route("/auth/logout", post(api::logout))
        .route("/auth/reset-password", post(api::reset_password))
        .merge(office_routes)
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .route("/", get(api::home))
        .nest("/api", api_routes)
        .merge(health_routes)
        .fallback(api::redirect_home)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
