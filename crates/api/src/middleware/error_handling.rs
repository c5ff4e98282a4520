//! # Error Handling Middleware
//!
//! Maps [`StudioError`] to HTTP status codes. Query endpoints answer failures
//! with `{"error": message}`; form actions answer with a [`FormState`] whose
//! status tells the client how to render the outcome.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use studio_core::errors::{StudioError, StudioResult};
use studio_core::form::{FieldErrors, FormData, FormState};
use studio_core::forms::ParseForm;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use studio_api::middleware::error_handling::AppError;
/// use studio_core::errors::StudioError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 0 {
///         return Err(AppError(StudioError::not_found("Coach", id)));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub StudioError);

/// Status code answered for each kind of failure.
pub fn status_for(err: &StudioError) -> StatusCode {
    match err {
        StudioError::NotFound(_) => StatusCode::NOT_FOUND,
        StudioError::Validation(_) => StatusCode::BAD_REQUEST,
        StudioError::Conflict(_) => StatusCode::CONFLICT,
        StudioError::Authentication(_) => StatusCode::UNAUTHORIZED,
        StudioError::Authorization(_) => StatusCode::FORBIDDEN,
        StudioError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        StudioError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_server_error(err: &StudioError) {
    if matches!(err, StudioError::Database(_) | StudioError::Internal(_)) {
        error!("Request failed: {:?}", err);
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log_server_error(&self.0);
        let status = status_for(&self.0);
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<StudioError> for AppError {
    fn from(err: StudioError) -> Self {
        AppError(err)
    }
}

/// Wraps the eyre error in a `StudioError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(StudioError::Database(err))
    }
}

pub fn map_error(err: StudioError) -> Response {
    AppError(err).into_response()
}

/// Reply of a form action: the [`FormState`] plus the status code it is sent
/// with. Field errors go out as 422, service failures with the status of
/// their [`StudioError`].
#[derive(Debug)]
pub struct FormReply<T>(pub StatusCode, pub FormState<T>);

impl<T> FormReply<T> {
    pub fn field_errors(form: &FormData, errors: FieldErrors) -> Self {
        FormReply(
            StatusCode::UNPROCESSABLE_ENTITY,
            FormState::field_errors(form, errors),
        )
    }

    pub fn failure(form: &FormData, err: StudioError) -> Self {
        log_server_error(&err);
        FormReply(status_for(&err), FormState::error(form, err.to_string()))
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        FormReply(StatusCode::OK, FormState::success(data, message))
    }

    pub fn from_result(form: &FormData, result: StudioResult<T>, message: &str) -> Self {
        match result {
            Ok(data) => Self::success(data, message),
            Err(err) => Self::failure(form, err),
        }
    }
}

impl<T: Serialize> IntoResponse for FormReply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

/// Parses `form` into `I`, runs `action` with it and wraps the outcome.
pub async fn form_action<I, T, F, Fut>(form: FormData, message: &str, action: F) -> FormReply<T>
where
    I: ParseForm,
    F: FnOnce(I) -> Fut,
    Fut: std::future::Future<Output = StudioResult<T>>,
{
    match I::parse(&form) {
        Ok(input) => FormReply::from_result(&form, action(input).await, message),
        Err(errors) => FormReply::field_errors(&form, errors),
    }
}
