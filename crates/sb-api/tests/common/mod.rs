//! Shared harness: the full router over in-memory storage and sessions,
//! with a tiny cookie jar so consecutive requests share one session.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::{Duration as Days, Utc};
use sb_api::AppState;
use sb_core::models::Snippet;
use sb_core::testing::{FakeHasher, MemorySnippetRepo, MemoryUserRepo};
use sb_core::{SnippetService, UserService};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

pub const HAIKU: &str = "An old silent pond...\nA frog jumps into the pond,\nsplash! Silence again.";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub snippets: Arc<MemorySnippetRepo>,
    pub users: Arc<MemoryUserRepo>,
}

impl TestApp {
    /// Fresh app with snippet #1 ("An old silent pond") already stored.
    pub fn new() -> Self {
        let snippets = Arc::new(MemorySnippetRepo::new());
        let users = Arc::new(MemoryUserRepo::new());

        let created = Utc::now();
        snippets.seed(Snippet {
            id: 1,
            title: "An old silent pond".into(),
            content: HAIKU.into(),
            created,
            expires: created + Days::days(365),
        });

        let state = AppState {
            snippets: SnippetService::new(snippets.clone()),
            users: UserService::new(users.clone(), Arc::new(FakeHasher)),
        };
        let sessions = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

        Self {
            router: sb_api::router(state, sessions, Duration::from_secs(10)),
            cookie: None,
            snippets,
            users,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let req = Request::get(path);
        self.send(req, Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req, Body::from(body)).await
    }

    pub async fn post_raw(&mut self, path: &str, content_type: &str, body: &'static [u8]) -> TestResponse {
        let req = Request::post(path).header(header::CONTENT_TYPE, content_type);
        self.send(req, Body::from(body)).await
    }

    async fn send(&mut self, mut req: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let res = self
            .router
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set) = res.headers().get(header::SET_COOKIE) {
            let set = set.to_str().unwrap();
            let pair = set.split(';').next().unwrap_or_default().trim();
            let cleared = pair.ends_with('=') || set.contains("Max-Age=0");
            self.cookie = if cleared { None } else { Some(pair.to_owned()) };
        }

        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/user/signup",
            &[("name", name), ("email", email), ("password", password)],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/user/login", &[("email", email), ("password", password)])
            .await
    }

    /// Registers Alice and logs her in; panics if either step misbehaves.
    pub async fn logged_in() -> Self {
        let mut app = Self::new();
        let res = app.signup("Alice", "alice@example.com", "pa$$word1").await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        let res = app.login("alice@example.com", "pa$$word1").await;
        assert_eq!(res.status, StatusCode::SEE_OTHER);
        app
    }
}
