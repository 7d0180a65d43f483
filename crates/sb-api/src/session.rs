//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps `tower_sessions::Session` so handlers deal in the two keys this
//! application uses: the authenticated user id and the one-shot flash.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sb_core::error::{AppError, Result};
use sb_ui::TemplateData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_sessions::Session;

use crate::error::WebError;

pub const AUTHENTICATED_USER_ID: &str = "authenticatedUserID";
pub const FLASH: &str = "flash";

/// Request extension set by the `authenticate` middleware once the session's
/// user id has been confirmed to still exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub i64);

#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
    authenticated: bool,
}

impl SessionContext {
    pub async fn put<T: Serialize + Send + Sync>(&self, key: &str, value: T) -> Result<()> {
        self.session
            .insert(key, value)
            .await
            .map_err(AppError::internal)
    }

    pub async fn get<T: DeserializeOwned + Send + Sync>(&self, key: &str) -> Result<Option<T>> {
        self.session.get(key).await.map_err(AppError::internal)
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.session
            .remove_value(key)
            .await
            .map(drop)
            .map_err(AppError::internal)
    }

    /// Rotates the session id, keeping the data. Call on every change of
    /// authentication state.
    pub async fn renew_token(&self) -> Result<()> {
        self.session.cycle_id().await.map_err(AppError::internal)
    }

    pub async fn put_flash(&self, message: &str) -> Result<()> {
        self.put(FLASH, message).await
    }

    /// Reads and clears the flash in one step.
    pub async fn pop_flash(&self) -> Result<Option<String>> {
        self.session
            .remove::<String>(FLASH)
            .await
            .map_err(AppError::internal)
    }

    pub async fn authenticated_user_id(&self) -> Result<Option<i64>> {
        self.get(AUTHENTICATED_USER_ID).await
    }

    /// Renews the token before recording the identity.
    pub async fn log_in(&self, user_id: i64) -> Result<()> {
        self.renew_token().await?;
        self.put(AUTHENTICATED_USER_ID, user_id).await
    }

    pub async fn log_out(&self) -> Result<()> {
        self.renew_token().await?;
        self.remove(AUTHENTICATED_USER_ID).await
    }

    /// True when the `authenticate` middleware vouched for this request.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Builds the per-page bundle. Consumes the pending flash.
    pub async fn template_data(&self) -> Result<TemplateData> {
        let flash = self.pop_flash().await?;
        Ok(TemplateData::new(flash, self.authenticated))
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| AppError::internal(format!("session unavailable ({status}): {msg}")))?;
        let authenticated = parts.extensions.get::<Authenticated>().is_some();
        Ok(Self {
            session,
            authenticated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    fn app() -> Router {
        Router::new()
            .route(
                "/put",
                get(|session: SessionContext| async move {
                    session.put_flash("X").await.map_err(WebError)?;
                    session.put("other", 5).await.map_err(WebError)?;
                    Ok::<_, WebError>("stored")
                }),
            )
            .route(
                "/get",
                get(|session: SessionContext| async move {
                    let flash = session.pop_flash().await.map_err(WebError)?;
                    Ok::<_, WebError>(flash.unwrap_or_else(|| "<absent>".into()))
                }),
            )
            .route(
                "/login",
                get(|session: SessionContext| async move {
                    session.log_in(9).await.map_err(WebError)?;
                    Ok::<_, WebError>("ok")
                }),
            )
            .route(
                "/whoami",
                get(|session: SessionContext| async move {
                    let id = session.authenticated_user_id().await.map_err(WebError)?;
                    Ok::<_, WebError>(format!("{id:?}"))
                }),
            )
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
    }

    async fn call(app: &Router, path: &str, cookie: Option<&str>) -> (Option<String>, String) {
        let mut req = Request::get(path);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let res = app
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (cookie, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn flash_is_read_exactly_once() {
        let app = app();
        let (cookie, _) = call(&app, "/put", None).await;
        let cookie = cookie.expect("session cookie");

        let (_, first) = call(&app, "/get", Some(&cookie)).await;
        let (_, second) = call(&app, "/get", Some(&cookie)).await;
        assert_eq!(first, "X");
        assert_eq!(second, "<absent>");
    }

    #[tokio::test]
    async fn log_in_rotates_the_session_id() {
        let app = app();
        let (before, _) = call(&app, "/put", None).await;
        let before = before.expect("session cookie");

        let (after, _) = call(&app, "/login", Some(&before)).await;
        let after = after.expect("rotated cookie");
        assert_ne!(before, after);

        let (_, who) = call(&app, "/whoami", Some(&after)).await;
        assert_eq!(who, "Some(9)");
        let (_, stale) = call(&app, "/whoami", Some(&before)).await;
        assert_eq!(stale, "None");
    }
}
