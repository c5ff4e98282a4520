use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use studio_core::{errors::StudioError, models::location::Asset};

use crate::test_utils::{form_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN, PUBLIC_BASE_URL};

const BOUNDARY: &str = "studio-boundary";

fn multipart_request(uri: &str, token: &str, files: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn uploads_are_stored_and_listed() {
    let (app, dir) = TestContext::new().with_sessions().build();

    let request = multipart_request("/api/files", ADMIN_TOKEN, &[("Studio Front.JPG", b"jpeg".as_slice())]);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let url = body[0]["url"].as_str().unwrap();
    assert!(url.starts_with(&format!("{}/uploads/", PUBLIC_BASE_URL)));
    assert!(url.ends_with(".jpg"));

    let stored: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn members_cannot_upload() {
    let (app, dir) = TestContext::new().with_sessions().build();

    let request = multipart_request("/api/files", MEMBER_TOKEN, &[("a.png", b"png".as_slice())]);
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = multipart_request("/api/files", ADMIN_TOKEN, &[]);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: No files uploaded");
}

#[tokio::test]
async fn files_are_removed_when_attaching_fails() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.locations
        .expect_add_location_assets()
        .returning(|id, _| Err(StudioError::not_found("Location", id)));
    let (app, dir) = ctx.build();

    let request = multipart_request("/api/locations/9/assets", ADMIN_TOKEN, &[("hall.png", b"png".as_slice())]);
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn deleting_an_asset_removes_its_file() {
    let mut ctx = TestContext::new().with_sessions();
    let file_path = ctx.upload_dir.path().join("photo.png");
    std::fs::write(&file_path, b"png").unwrap();
    ctx.locations
        .expect_delete_asset()
        .with(eq(5))
        .returning(|id| {
            Ok(Asset {
                id,
                owner_id: 9,
                name: "photo.png".to_string(),
                url: format!("{}/uploads/photo.png", PUBLIC_BASE_URL),
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request("DELETE", "/api/locations/assets/5", Some(ADMIN_TOKEN), "");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
    assert!(!file_path.exists());
}
