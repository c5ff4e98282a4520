use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use pretty_assertions::assert_eq;
use studio_core::models::user::{Session, User, UserRole};

use crate::test_utils::{
    admin, form_request, get_request, member, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN,
};

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _dir) = TestContext::new().build();

    let (status, body) = send(app, get_request("/api/users", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        "Authentication error: Missing Authorization header"
    );
}

#[tokio::test]
async fn expired_session_is_unauthorized() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let (status, _) = send(app, get_request("/api/users", Some("stale"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn members_cannot_list_users() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let (status, _) = send(app, get_request("/api/users", Some(MEMBER_TOKEN))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_list_users() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.users
        .expect_list_users()
        .times(1)
        .returning(|| Ok(vec![admin(), member()]));
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/users", Some(ADMIN_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn members_only_see_their_own_profile() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let (status, _) = send(app, get_request("/api/users/99", Some(MEMBER_TOKEN))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_returns_the_session() {
    let mut ctx = TestContext::new();
    ctx.users.expect_login().times(1).returning(|credentials| {
        assert_eq!(credentials.email, "maya@example.com");
        Ok(Session {
            token: "fresh".to_string(),
            user: member(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        })
    });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/auth/login",
        None,
        "email=Maya%40Example.com&password=secret-pass",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["token"], "fresh");
}

#[tokio::test]
async fn register_reports_every_invalid_field() {
    let (app, _dir) = TestContext::new().build();

    let request = form_request(
        "POST",
        "/api/auth/register",
        None,
        "name=Maya&email=not-an-email&password=short&password_confirmation=other",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "field-errors");
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
    assert!(errors.contains_key("password_confirmation"));
    assert_eq!(body["form"]["name"], "Maya");
}

#[test_log::test(tokio::test)]
async fn members_cannot_promote_themselves() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.users
        .expect_update_user()
        .withf(|id, update| *id == 7 && update.role.is_none())
        .times(1)
        .returning(|_, update| {
            Ok(User {
                name: update.name,
                ..member()
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "PUT",
        "/api/users/7",
        Some(MEMBER_TOKEN),
        "name=Maya+M&email=maya%40example.com&role=admin",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Maya M");
    assert_eq!(body["data"]["role"], serde_json::json!(UserRole::Member));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut ctx = TestContext::new();
    ctx.users
        .expect_logout()
        .withf(|token| token == "abc")
        .times(1)
        .returning(|_| Ok(()));
    let (app, _dir) = ctx.build();

    let (status, _) = send(app, form_request("POST", "/api/auth/logout", Some("abc"), "")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[test_log::test(tokio::test)]
async fn registration_always_creates_a_member() {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    let mut ctx = TestContext::new();
    let expected_email = email.to_lowercase();
    ctx.users
        .expect_register()
        .withf(move |new_user| new_user.email == expected_email && new_user.role == UserRole::Member)
        .times(1)
        .returning(|new_user| {
            Ok(User {
                id: 12,
                name: new_user.name,
                email: new_user.email,
                phone: new_user.phone,
                role: new_user.role,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            })
        });
    let (app, _dir) = ctx.build();

    let body = format!(
        "name={}&email={}&password=long-enough&password_confirmation=long-enough&role=admin",
        name.replace(' ', "+").replace('\'', "%27"),
        email.replace('@', "%40"),
    );
    let (status, body) = send(app, form_request("POST", "/api/auth/register", None, &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "member");
    assert_eq!(body["message"], "Account created");
}
