use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use studio_core::{
    errors::StudioError,
    models::coach::{Coach, CoachInput},
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn coach(id: i64, name: &str) -> Coach {
    Coach {
        id,
        name: name.to_string(),
        bio: None,
        image_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn coaches_are_listed_without_signing_in() {
    let mut ctx = TestContext::new();
    ctx.coaches
        .expect_list_coaches()
        .returning(|| Ok(vec![coach(1, "Rani"), coach(2, "Tomas")]));
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/coaches", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["name"], "Tomas");
}

#[tokio::test]
async fn admin_creates_a_coach() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.coaches
        .expect_create_coach()
        .with(eq(CoachInput {
            name: "Rani".to_string(),
            bio: Some("Vinyasa and yin".to_string()),
            image_url: None,
        }))
        .times(1)
        .returning(|input| Ok(coach(3, &input.name)));
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/coaches",
        Some(ADMIN_TOKEN),
        "name=Rani&bio=Vinyasa+and+yin&image_url=",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Coach created");
    assert_eq!(body["data"]["id"], 3);
}

#[tokio::test]
async fn members_cannot_create_coaches() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request("POST", "/api/coaches", Some(MEMBER_TOKEN), "name=Rani");
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_name_is_a_field_error() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request("POST", "/api/coaches", Some(ADMIN_TOKEN), "bio=Strong");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"][0], "Required");
    assert_eq!(body["form"]["bio"], "Strong");
}

#[tokio::test]
async fn coach_with_agendas_cannot_be_deleted() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.coaches
        .expect_delete_coach()
        .with(eq(2))
        .returning(|_| Err(StudioError::Conflict("Coach has scheduled agendas".into())));
    let (app, _dir) = ctx.build();

    let request = form_request("DELETE", "/api/coaches/2", Some(ADMIN_TOKEN), "");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict: Coach has scheduled agendas");
}
