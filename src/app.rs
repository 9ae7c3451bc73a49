use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{PasswordHasher, TokenService};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{MemoryStore, NoteStore, UserStore};
use crate::handlers::{protected, public};
use crate::middleware::require_auth;

/// Shared, read-only application state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub notes: Arc<dyn NoteStore>,
    pub passwords: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        passwords: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = TokenService::new(&config.security);
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            users,
            notes,
            passwords,
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: AppConfig, passwords: Arc<dyn PasswordHasher>) -> Self {
        let store = MemoryStore::new();
        Self::new(config, Arc::new(store.clone()), Arc::new(store), passwords)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);
    let request_logging = state.config.api.enable_request_logging;

    let app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors);

    // Request spans only when API_ENABLE_REQUEST_LOGGING is on
    let app = if request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/api/v1/profile", get(protected::profile))
        .route("/api/v1/notes", post(notes::create).get(notes::list))
        .route(
            "/api/v1/notes/:id",
            get(notes::show).put(notes::update).delete(notes::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
