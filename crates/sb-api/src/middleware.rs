//! snippetbox/crates/sb-api/src/middleware.rs Middleware
//!
//! Custom middleware for security headers, authentication, and panic recovery.

use std::any::Any;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::WebResult;
use crate::handlers::AppState;
use crate::session::{Authenticated, SessionContext};

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

/// Adds the standard browser-hardening headers to every response.
pub async fn secure_headers(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("origin-when-cross-origin"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("deny"));
    headers.insert(header::X_XSS_PROTECTION, HeaderValue::from_static("0"));
    res
}

/// Marks the request `Authenticated` when the session names a user that
/// still exists.
pub async fn authenticate(
    State(state): State<AppState>,
    session: SessionContext,
    mut req: Request,
    next: Next,
) -> WebResult<Response> {
    if let Some(id) = session.authenticated_user_id().await? {
        if state.users.exists(id).await? {
            req.extensions_mut().insert(Authenticated(id));
        } else {
            tracing::warn!(user_id = id, "session names a user that no longer exists");
        }
    }
    Ok(next.run(req).await)
}

/// Sends anonymous visitors to the login page; authenticated responses are
/// marked uncacheable.
pub async fn require_authentication(req: Request, next: Next) -> Response {
    if req.extensions().get::<Authenticated>().is_none() {
        return Redirect::to("/user/login").into_response();
    }
    let mut res = next.run(req).await;
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    res
}

/// Response for a handler that panicked: log it, return a bare 500, and
/// ask the client to drop the connection.
pub fn recover_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "handler panicked");

    let mut res = (
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::INTERNAL_SERVER_ERROR
            .canonical_reason()
            .unwrap_or_default(),
    )
        .into_response();
    res.headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    res
}
