/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::in_memory(config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use taskboard_shared::{
    auth::session::SessionKeys,
    services::{AccountService, TaskService},
    store::{
        AccountRepository, InMemoryAccountRepository, InMemoryTaskRepository, PgAccountRepository,
        PgTaskRepository, TaskRepository,
    },
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::Config,
    middleware::{
        guard::{route_guard, RouteGuard},
        security::SecurityHeadersLayer,
    },
    routes,
};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub accounts: AccountService,
    pub sessions: SessionKeys,
    pub guard: RouteGuard,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, tasks: Arc<dyn TaskRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        let sessions = SessionKeys::new(&config.session.secret, Duration::days(config.session.ttl_days));

        Self {
            tasks: TaskService::new(tasks),
            accounts: AccountService::new(accounts, config.auth.hash_cost),
            sessions,
            guard: RouteGuard::new(),
            config: Arc::new(config),
        }
    }

    /// State backed by the PostgreSQL adapters
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self::new(
            config,
            Arc::new(PgTaskRepository::new(pool.clone())),
            Arc::new(PgAccountRepository::new(pool)),
        )
    }

    /// State backed by process-local storage; nothing survives a restart
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryAccountRepository::new()),
        )
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /health
/// ├── POST /register, /login, /logout, /auth/provider
/// ├── GET  /dashboard
/// ├── /tasks
/// │   ├── GET, POST        /
/// │   ├── GET              /board
/// │   ├── GET, PUT, DELETE /:id
/// │   └── PATCH            /:id/status
/// └── /settings
///     ├── GET, PUT /profile
///     └── PUT      /password
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Cookie jar (tower-cookies)
/// 2. CORS, so preflights never reach the guard
/// 3. Security headers
/// 4. Route guard (redirects, and attaches the caller's identity)
/// 5. Request tracing
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/auth/provider", post(routes::auth::provider_sign_in));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route("/board", get(routes::tasks::board))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/:id/status", patch(routes::tasks::update_status));

    let settings_routes = Router::new()
        .route(
            "/profile",
            get(routes::settings::get_profile).put(routes::settings::update_profile),
        )
        .route("/password", put(routes::settings::change_password));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .merge(auth_routes)
        .nest("/tasks", task_routes)
        .nest("/settings", settings_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(axum::middleware::from_fn_with_state(state.clone(), route_guard))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .layer(cors)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
