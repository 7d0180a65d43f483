//! # sb-ui
//!
//! Askama page templates and the data bundle every page receives.
//! Nothing here formats HTML by hand; handlers fill the structs and render.

use askama::Template;
use chrono::{DateTime, Datelike, Utc};
use sb_core::forms::{SnippetCreateForm, UserLoginForm, UserSignupForm};
use sb_core::models::Snippet;

/// Directory holding `/static` assets (stylesheets).
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Per-request values shared by every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    pub current_year: i32,
    /// One-shot message popped from the session.
    pub flash: Option<String>,
    pub is_authenticated: bool,
}

impl TemplateData {
    pub fn new(flash: Option<String>, is_authenticated: bool) -> Self {
        Self {
            current_year: Utc::now().year(),
            flash,
            is_authenticated,
        }
    }
}

/// A snippet with its timestamps already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: String,
    pub expires: String,
}

impl From<Snippet> for SnippetView {
    fn from(s: Snippet) -> Self {
        Self {
            id: s.id,
            title: s.title,
            content: s.content,
            created: human_date(s.created),
            expires: human_date(s.expires),
        }
    }
}

/// e.g. `17 Oct 2026 at 09:15`, always in UTC.
pub fn human_date(t: DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub data: TemplateData,
    pub snippets: Vec<SnippetView>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub data: TemplateData,
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub data: TemplateData,
    pub snippet: SnippetView,
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub data: TemplateData,
    pub form: SnippetCreateForm,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub data: TemplateData,
    pub form: UserSignupForm,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub data: TemplateData,
    pub form: UserLoginForm,
}
