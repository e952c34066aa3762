/// Route guard
///
/// Runs before every handler. The decision itself is a pure function of the
/// path, the query string and whether the caller has a valid session:
///
/// 1. Entry page (`/login`, `/register`) with a session: redirect to the
///    landing page (`/dashboard`). This check comes first.
/// 2. Protected area (`/dashboard`, `/tasks`, `/settings`) without a session:
///    redirect to `/login?callbackUrl=<original path and query>`.
/// 3. Anything else passes through untouched.
///
/// Prefixes match on path-segment boundaries, so `/tasks` protects
/// `/tasks/123` but not `/tasksearch`. Redirects are `307` so the method is
/// preserved.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{app::AppState, session::resolve_identity};

pub const ENTRY_PAGES: &[&str] = &["/login", "/register"];
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/tasks", "/settings"];
pub const LANDING_PAGE: &str = "/dashboard";
pub const LOGIN_PAGE: &str = "/login";

/// Query parameter carrying the return-to path
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Outcome of [`RouteGuard::decide`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,

    /// Temporary redirect to the location
    Redirect(String),
}

/// Path rules of the guard
#[derive(Debug, Clone)]
pub struct RouteGuard {
    entry_pages: Vec<String>,
    protected_prefixes: Vec<String>,
    landing_page: String,
    login_page: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            entry_pages: ENTRY_PAGES.iter().map(|p| p.to_string()).collect(),
            protected_prefixes: PROTECTED_PREFIXES.iter().map(|p| p.to_string()).collect(),
            landing_page: LANDING_PAGE.to_string(),
            login_page: LOGIN_PAGE.to_string(),
        }
    }
}

/// `path` equals `prefix` or continues it with a new segment
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_entry_page(&self, path: &str) -> bool {
        self.entry_pages.iter().any(|p| matches_prefix(path, p))
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes.iter().any(|p| matches_prefix(path, p))
    }

    /// Decides what happens to a request
    pub fn decide(&self, path: &str, query: Option<&str>, authenticated: bool) -> GuardDecision {
        if self.is_entry_page(path) {
            return if authenticated {
                GuardDecision::Redirect(self.landing_page.clone())
            } else {
                GuardDecision::Allow
            };
        }

        if self.is_protected(path) && !authenticated {
            let original = match query.filter(|q| !q.is_empty()) {
                Some(query) => format!("{}?{}", path, query),
                None => path.to_string(),
            };

            return GuardDecision::Redirect(format!(
                "{}?{}={}",
                self.login_page,
                CALLBACK_PARAM,
                urlencoding::encode(&original)
            ));
        }

        GuardDecision::Allow
    }
}

/// Guard middleware
///
/// Resolves the session and, when valid, stores the
/// [`Identity`](taskboard_shared::auth::session::Identity) in the request
/// extensions for [`AuthUser`](crate::session::AuthUser).
pub async fn route_guard(State(state): State<AppState>, cookies: Cookies, mut req: Request, next: Next) -> Response {
    let identity = resolve_identity(&state.sessions, &cookies, req.headers());

    let decision = state
        .guard
        .decide(req.uri().path(), req.uri().query(), identity.is_some());

    match decision {
        GuardDecision::Allow => {
            if let Some(identity) = identity {
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
        GuardDecision::Redirect(location) => {
            tracing::debug!(path = %req.uri().path(), location = %location, "Guard redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
