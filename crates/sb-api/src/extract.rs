//! `FormBody<F>`: axum extractor over the core form decoder.

use std::any::type_name;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use sb_core::error::AppError;
use sb_core::form::{self, FormSchema};

use crate::error::WebError;

/// A decoded, not yet validated, form submission.
///
/// Client faults reject with 400. A schema defect in `F` is a bug: it is
/// logged and the request panics, which the panic-recovery layer turns
/// into a 500.
#[derive(Debug)]
pub struct FormBody<F>(pub F);

impl<S, F> FromRequest<S> for FormBody<F>
where
    S: Send + Sync,
    F: FormSchema + Send,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::ClientInput(rejection.body_text()))?;

        match form::decode::<F>(content_type.as_deref(), &body) {
            Ok(decoded) => Ok(Self(decoded)),
            Err(err) if err.is_defect() => {
                tracing::error!(error = %err, form = type_name::<F>(), "form schema defect");
                panic!("form schema defect in {}: {err}", type_name::<F>());
            }
            Err(err) => {
                tracing::debug!(error = %err, form = type_name::<F>(), "rejected form body");
                Err(AppError::ClientInput(err.to_string()).into())
            }
        }
    }
}
