//! # sb-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core services.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use sb_core::error::AppError;
use sb_core::forms::{SnippetCreateForm, UserLoginForm, UserSignupForm};
use sb_core::{SnippetService, UserService};
use sb_ui::{
    AboutTemplate, CreateTemplate, HomeTemplate, LoginTemplate, SignupTemplate, SnippetView,
    ViewTemplate,
};

use crate::error::{WebError, WebResult};
use crate::extract::FormBody;
use crate::session::SessionContext;

/// State shared across all request handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub snippets: SnippetService,
    pub users: UserService,
}

/// Renders into a buffer first so a template error becomes a clean 500
/// instead of a half-written page.
fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => WebError(AppError::internal(format!("template render failed: {err}")))
            .into_response(),
    }
}

pub async fn ping() -> &'static str {
    "OK"
}

pub async fn not_found() -> WebError {
    WebError(AppError::NotFound)
}

pub async fn home(State(state): State<AppState>, session: SessionContext) -> WebResult<Response> {
    let snippets = state.snippets.latest().await?;
    let page = HomeTemplate {
        data: session.template_data().await?,
        snippets: snippets.into_iter().map(SnippetView::from).collect(),
    };
    Ok(render(StatusCode::OK, &page))
}

pub async fn about(session: SessionContext) -> WebResult<Response> {
    let page = AboutTemplate {
        data: session.template_data().await?,
    };
    Ok(render(StatusCode::OK, &page))
}

/// Anything that is not a positive integer is a 404, same as a missing row.
pub async fn snippet_view(
    State(state): State<AppState>,
    session: SessionContext,
    Path(raw_id): Path<String>,
) -> WebResult<Response> {
    let id = raw_id
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or(AppError::NotFound)?;
    let snippet = state.snippets.get(id).await?;

    let page = ViewTemplate {
        data: session.template_data().await?,
        snippet: snippet.into(),
    };
    Ok(render(StatusCode::OK, &page))
}

pub async fn snippet_create(session: SessionContext) -> WebResult<Response> {
    let page = CreateTemplate {
        data: session.template_data().await?,
        form: SnippetCreateForm::default(),
    };
    Ok(render(StatusCode::OK, &page))
}

pub async fn snippet_create_post(
    State(state): State<AppState>,
    session: SessionContext,
    FormBody(mut form): FormBody<SnippetCreateForm>,
) -> WebResult<Response> {
    if !form.validate() {
        let page = CreateTemplate {
            data: session.template_data().await?,
            form,
        };
        return Ok(render(StatusCode::UNPROCESSABLE_ENTITY, &page));
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;

    session.put_flash("Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

pub async fn user_signup(session: SessionContext) -> WebResult<Response> {
    let page = SignupTemplate {
        data: session.template_data().await?,
        form: UserSignupForm::default(),
    };
    Ok(render(StatusCode::OK, &page))
}

pub async fn user_signup_post(
    State(state): State<AppState>,
    session: SessionContext,
    FormBody(mut form): FormBody<UserSignupForm>,
) -> WebResult<Response> {
    if form.validate() {
        match state
            .users
            .insert(&form.name, &form.email, &form.password)
            .await
        {
            Ok(_) => {
                session
                    .put_flash("Your signup was successful. Please log in.")
                    .await?;
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(AppError::DuplicateEmail) => {
                form.validator
                    .add_field_error("email", "Email address is already in use");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let page = SignupTemplate {
        data: session.template_data().await?,
        form,
    };
    Ok(render(StatusCode::UNPROCESSABLE_ENTITY, &page))
}

pub async fn user_login(session: SessionContext) -> WebResult<Response> {
    let page = LoginTemplate {
        data: session.template_data().await?,
        form: UserLoginForm::default(),
    };
    Ok(render(StatusCode::OK, &page))
}

pub async fn user_login_post(
    State(state): State<AppState>,
    session: SessionContext,
    FormBody(mut form): FormBody<UserLoginForm>,
) -> WebResult<Response> {
    if form.validate() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(id) => {
                session.log_in(id).await?;
                tracing::info!(user_id = id, "user logged in");
                return Ok(Redirect::to("/snippet/create").into_response());
            }
            Err(AppError::InvalidCredentials) => {
                form.validator
                    .add_non_field_error("Email or password is incorrect");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let page = LoginTemplate {
        data: session.template_data().await?,
        form,
    };
    Ok(render(StatusCode::UNPROCESSABLE_ENTITY, &page))
}

pub async fn user_logout_post(session: SessionContext) -> WebResult<Response> {
    session.log_out().await?;
    session
        .put_flash("You've been logged out successfully!")
        .await?;
    Ok(Redirect::to("/").into_response())
}
