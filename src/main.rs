//! Reef Life Magazine Backend
//!
//! REST backend for the Reef Life magazine site: flat-file JSON collections,
//! session authentication, and gateways to the flip-book render service, the
//! contact list and the mail relay.

mod api;
mod auth;
mod config;
mod errors;
mod gateway;
mod models;
mod store;
mod uploads;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use config::Config;
use gateway::{ContactsClient, FlipbookClient, Mailer, Notifier};
use store::Repositories;

/// Uploaded magazine PDFs can be large; everything else stays far below this.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<Repositories>,
    pub sessions: Arc<SessionStore>,
    pub flipbook: Arc<FlipbookClient>,
    pub mailer: Arc<Mailer>,
    pub notifier: Notifier,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reef Life Backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.upload_token == config::DEFAULT_UPLOAD_TOKEN {
        tracing::warn!(
            "PDF access token is the development default (REEF_UPLOAD_TOKEN). Set it in production!"
        );
    }
    if config.session_secret == config::DEFAULT_SESSION_SECRET {
        tracing::warn!(
            "Session secret is the development default (REEF_SESSION_SECRET). Set it in production!"
        );
    }
    if config.admin_email.is_none() {
        tracing::warn!(
            "No admin email configured (REEF_ADMIN_EMAIL). No account can reach the admin panel!"
        );
    }
    if config.flipbook_api_key.is_none() {
        tracing::warn!(
            "No flip-book API key configured (REEF_FLIPBOOK_API_KEY). Magazine uploads will fail!"
        );
    }

    // Create the data, upload and public image directories
    uploads::ensure_directories(&config).await?;

    // Wire up repositories, sessions and the outbound gateways
    let repos = Arc::new(Repositories::new(&config.data_dir));
    let sessions = Arc::new(SessionStore::new(config.session_secret.clone()));
    let flipbook = Arc::new(FlipbookClient::new(&config));
    let contacts = Arc::new(ContactsClient::new(&config));
    let mailer = Arc::new(Mailer::new(&config));
    let notifier = Notifier::spawn(contacts, flipbook.clone());

    let state = AppState {
        repos,
        sessions,
        flipbook,
        mailer,
        notifier,
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

    // Clone the session store for the admin gate
    let sessions = state.sessions.clone();

    // Public API: active-record listings and the auth flow
    let public_api = Router::new()
        .route("/magazines", get(api::list_magazines))
        .route("/flipbook/{id}", get(api::get_flipbook))
        .route("/advertisers", get(api::list_advertisers))
        .route("/sponsors", get(api::list_sponsors))
        .route("/reefclubs", get(api::list_reef_clubs))
        .route("/events", get(api::list_events))
        .route("/news", get(api::list_news))
        .route("/products", get(api::list_products))
        .route("/register", post(api::register))
        .route("/login", post(api::login))
        .route("/logout", post(api::logout))
        .route("/recoverAccount", post(api::recover_account))
        .route("/user", get(api::current_user));

    // Admin API: full CRUD behind the session gate
    let admin_api = Router::new()
        // Magazines
        .route("/magazines", get(api::admin_list_magazines))
        .route("/magazines", post(api::create_magazine))
        .route("/magazines/{id}", get(api::admin_get_magazine))
        .route("/magazines/{id}", patch(api::update_magazine))
        .route("/magazines/{id}", delete(api::delete_magazine))
        // Advertisers
        .route("/advertisers", get(api::admin_list_advertisers))
        .route("/advertisers", post(api::create_advertiser))
        .route("/advertisers/{id}", get(api::admin_get_advertiser))
        .route("/advertisers/{id}", patch(api::update_advertiser))
        .route("/advertisers/{id}", delete(api::delete_advertiser))
        // Sponsors
        .route("/sponsors", get(api::admin_list_sponsors))
        .route("/sponsors", post(api::create_sponsor))
        .route("/sponsors/{id}", get(api::admin_get_sponsor))
        .route("/sponsors/{id}", patch(api::update_sponsor))
        .route("/sponsors/{id}", delete(api::delete_sponsor))
        // Reef clubs
        .route("/reefclubs", get(api::admin_list_reef_clubs))
        .route("/reefclubs", post(api::create_reef_club))
        .route("/reefclubs/{id}", get(api::admin_get_reef_club))
        .route("/reefclubs/{id}", patch(api::update_reef_club))
        .route("/reefclubs/{id}", delete(api::delete_reef_club))
        // Events
        .route("/events", get(api::admin_list_events))
        .route("/events", post(api::create_event))
        .route("/events/{id}", get(api::admin_get_event))
        .route("/events/{id}", patch(api::update_event))
        .route("/events/{id}", delete(api::delete_event))
        // News
        .route("/news", get(api::admin_list_news))
        .route("/news", post(api::create_news))
        .route("/news/{id}", get(api::admin_get_news))
        .route("/news/{id}", patch(api::update_news))
        .route("/news/{id}", delete(api::delete_news))
        // Products
        .route("/products", get(api::admin_list_products))
        .route("/products", post(api::create_product))
        .route("/products/{id}", get(api::admin_get_product))
        .route("/products/{id}", patch(api::update_product))
        .route("/products/{id}", delete(api::delete_product))
        // Members (seeded externally, so no create route)
        .route("/members", get(api::admin_list_members))
        .route("/members/{id}", get(api::admin_get_member))
        .route("/members/{id}", patch(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        // Apply the admin session gate
        .layer(middleware::from_fn(move |req, next| {
            auth::require_admin(sessions.clone(), req, next)
        }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    // Uploaded PDFs, token gated
    let upload_routes = Router::new()
        .route("/uploads/{filename}", get(api::serve_upload))
        .route(
            "/uploads/splitted/{filename}",
            get(api::serve_splitted_upload),
        );

    // Gated pages; everything else in the public directory is served as is
    let page_routes = Router::new()
        .route("/admin", get(api::admin_page))
        .route("/archive", get(api::archive_page))
        .route("/login", get(api::login_page))
        .route("/flipbook/{id}", get(api::flipbook_page));

    // Health check (no session required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_api)
        .nest("/api", public_api)
        .merge(upload_routes)
        .merge(page_routes)
        .merge(health_routes)
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
