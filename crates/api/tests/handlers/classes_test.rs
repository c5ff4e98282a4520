use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use studio_core::{
    errors::StudioError,
    models::class::{Class, ClassDetail, ClassInput, ClassType},
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn class(id: i64, input: &ClassInput) -> Class {
    Class {
        id,
        name: input.name.clone(),
        description: None,
        class_type_id: input.class_type_id,
        duration_minutes: input.duration_minutes,
        capacity: input.capacity,
        is_active: input.is_active,
        created_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
    }
}

fn morning_flow() -> ClassInput {
    ClassInput {
        name: "Morning Flow".to_string(),
        class_type_id: 2,
        duration_minutes: 60,
        capacity: 12,
        is_active: true,
    }
}

#[tokio::test]
async fn admin_creates_a_class() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.classes
        .expect_create_class()
        .with(eq(morning_flow()))
        .times(1)
        .returning(|input| Ok(class(4, &input)));
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/classes",
        Some(ADMIN_TOKEN),
        "name=Morning+Flow&class_type_id=2&duration_minutes=60&capacity=12&is_active=on",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class created");
    assert_eq!(body["data"]["id"], 4);
    assert_eq!(body["data"]["is_active"], true);
}

#[tokio::test]
async fn class_fields_are_checked_before_saving() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/classes",
        Some(ADMIN_TOKEN),
        "name=&class_type_id=2&duration_minutes=1500&capacity=0",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"][0], "Required");
    assert_eq!(body["errors"]["duration_minutes"][0], "Must be shorter than a day");
    assert_eq!(body["errors"]["capacity"][0], "Must be greater than zero");
    assert_eq!(body["form"]["duration_minutes"], "1500");
}

#[tokio::test]
async fn members_cannot_create_classes() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/classes",
        Some(MEMBER_TOKEN),
        "name=Morning+Flow&class_type_id=2&duration_minutes=60&capacity=12",
    );
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn class_detail_is_public() {
    let mut ctx = TestContext::new();
    ctx.classes
        .expect_get_class()
        .with(eq(4))
        .returning(|id| {
            Ok(ClassDetail {
                class: class(id, &morning_flow()),
                class_type: ClassType {
                    id: 2,
                    name: "Yoga".to_string(),
                },
                location_ids: vec![1, 3],
                assets: vec![],
            })
        });
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/classes/4", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"]["name"], "Morning Flow");
    assert_eq!(body["class_type"]["name"], "Yoga");
    assert_eq!(body["location_ids"], serde_json::json!([1, 3]));
}

#[tokio::test]
async fn missing_class_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.classes
        .expect_get_class()
        .returning(|id| Err(StudioError::not_found("Class", id)));
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/classes/99", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found: Class with ID 99 not found");
}

#[tokio::test]
async fn class_types_are_created_by_name() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.classes
        .expect_create_class_type()
        .with(eq("Pilates".to_string()))
        .times(1)
        .returning(|name| Ok(ClassType { id: 3, name }));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/class-types", Some(ADMIN_TOKEN), "name=Pilates");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Pilates");
}
