//! # sb-api
//!
//! The web routing and orchestration layer for Snippetbox.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod session;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

pub use handlers::AppState;

/// Builds the complete application router.
///
/// Session-aware routes additionally sit behind the
/// session manager and the `authenticate` middleware; `/snippet/create` and
/// `/user/logout` also require a logged-in user.
pub fn router<Store>(
    state: AppState,
    sessions: SessionManagerLayer<Store>,
    request_timeout: Duration,
) -> Router
where
    Store: SessionStore + Clone,
{
    let protected = Router::new()
        .route(
            "/snippet/create",
            get(handlers::snippet_create).post(handlers::snippet_create_post),
        )
        .route("/user/logout", post(handlers::user_logout_post))
        .route_layer(axum::middleware::from_fn(middleware::require_authentication));

    let dynamic = Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/snippet/view/{id}", get(handlers::snippet_view))
        .route(
            "/user/signup",
            get(handlers::user_signup).post(handlers::user_signup_post),
        )
        .route(
            "/user/login",
            get(handlers::user_login).post(handlers::user_login_post),
        )
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(sessions);

    let app = Router::new()
        .route("/ping", get(handlers::ping))
        .nest_service("/static", ServeDir::new(sb_ui::STATIC_DIR))
        .merge(dynamic)
        .fallback(handlers::not_found);

    harden(app, request_timeout).with_state(state)
}

/// Layers every response passes through, outermost first: tracing,
/// security headers, panic recovery, request timeout. Timeouts and
/// recovered panics still leave with the security headers.
fn harden<S>(app: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        request_timeout,
    ))
    .layer(CatchPanicLayer::custom(middleware::recover_panic))
    .layer(axum::middleware::from_fn(middleware::secure_headers))
    .layer(TraceLayer::new_for_http())
}
