use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use studio_api::middleware::error_handling::{map_error, FormReply};
use studio_core::{
    errors::StudioError,
    form::{FieldErrors, FormData},
};

async fn body_of(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case(StudioError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
#[case(StudioError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(StudioError::Conflict("taken".into()), StatusCode::CONFLICT)]
#[case(StudioError::Authentication("who".into()), StatusCode::UNAUTHORIZED)]
#[case(StudioError::Authorization("no".into()), StatusCode::FORBIDDEN)]
#[case(StudioError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    StudioError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "disk"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[tokio::test]
async fn errors_map_to_status_codes(#[case] error: StudioError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn query_errors_carry_the_message() {
    let response = map_error(StudioError::not_found("Coach", 4));
    let body = body_of(response).await;
    assert_eq!(
        body,
        json!({ "error": "Resource not found: Coach with ID 4 not found" })
    );
}

#[tokio::test]
async fn field_errors_echo_the_form_with_422() {
    let form = FormData::from_pairs([("name", ""), ("capacity", "many")]);
    let errors = FieldErrors::single("capacity", "Must be a number");

    let response = FormReply::<()>::field_errors(&form, errors).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_of(response).await;
    assert_eq!(body["status"], "field-errors");
    assert_eq!(body["form"]["capacity"], "many");
    assert_eq!(body["errors"]["capacity"], json!(["Must be a number"]));
}

#[tokio::test]
async fn failed_action_keeps_the_form_and_reports_the_error() {
    let form = FormData::from_pairs([("code", "SPRING")]);
    let reply = FormReply::<()>::failure(&form, StudioError::Conflict("Code exists".into()));

    let response = reply.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_of(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["form"]["code"], "SPRING");
    assert_eq!(body["message"], "Conflict: Code exists");
}

#[tokio::test]
async fn success_clears_the_form() {
    let response = FormReply::success(42, "Saved").into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_of(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["form"], json!({}));
    assert_eq!(body["data"], 42);
    assert_eq!(body["message"], "Saved");
}
