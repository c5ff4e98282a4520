use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use studio_core::{
    errors::StudioError,
    models::location::{FacilityAvailability, OperationalHour},
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn admin_replaces_operational_hours() {
    let expected = vec![
        OperationalHour {
            day_of_week: 1,
            open_time: hm(7, 0),
            close_time: hm(21, 0),
        },
        OperationalHour {
            day_of_week: 6,
            open_time: hm(8, 0),
            close_time: hm(12, 0),
        },
    ];
    let mut ctx = TestContext::new().with_sessions();
    ctx.locations
        .expect_set_operational_hours()
        .with(eq(2), eq(expected))
        .times(1)
        .returning(|_, hours| Ok(hours));
    let (app, _dir) = ctx.build();

    // Rows arrive out of order and come back sorted by day.
    let request = form_request(
        "PUT",
        "/api/locations/2/operational-hours",
        Some(ADMIN_TOKEN),
        "day_of_week%5B%5D=6&open_time%5B%5D=08%3A00&close_time%5B%5D=12%3A00\
         &day_of_week%5B%5D=1&open_time%5B%5D=07%3A00&close_time%5B%5D=21%3A00",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Operational hours saved");
    assert_eq!(body["data"][0]["open_time"], "07:00:00");
    assert_eq!(body["data"][1]["day_of_week"], 6);
}

#[tokio::test]
async fn overlapping_hours_are_reported_per_row() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "PUT",
        "/api/locations/2/operational-hours",
        Some(ADMIN_TOKEN),
        "day_of_week=1&open_time=07%3A00&close_time=12%3A00\
         &day_of_week=1&open_time=11%3A00&close_time=14%3A00",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["operational_hours.1"][0],
        "Overlaps another opening on the same day"
    );
    assert!(body["errors"]["operational_hours.0"].is_null());
}

#[tokio::test]
async fn members_cannot_change_opening_hours() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "PUT",
        "/api/locations/2/operational-hours",
        Some(MEMBER_TOKEN),
        "day_of_week=1&open_time=07%3A00&close_time=12%3A00",
    );
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn availability_forwards_the_query() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let mut ctx = TestContext::new();
    ctx.locations
        .expect_facility_availability()
        .with(eq(5), eq(date), eq(90), eq(30))
        .times(1)
        .returning(|facility_id, date, duration_minutes, _| {
            Ok(FacilityAvailability {
                facility_id,
                date,
                duration_minutes,
                slots: vec![hm(7, 0), hm(10, 30)],
            })
        });
    let (app, _dir) = ctx.build();

    let request = get_request("/api/facilities/5/availability?date=2024-06-03&duration=90", None);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration_minutes"], 90);
    assert_eq!(body["slots"], serde_json::json!(["07:00:00", "10:30:00"]));
}

#[rstest]
#[case("duration=9223372036854775807")]
#[case("duration=1441")]
#[case("duration=0")]
#[case("step=-15")]
#[case("step=9223372036854775807")]
#[tokio::test]
async fn availability_lengths_must_fit_in_a_day(#[case] query: &str) {
    // No expectation on the service: reaching it fails the test.
    let (app, _dir) = TestContext::new().build();

    let uri = format!("/api/facilities/5/availability?date=2024-06-03&{}", query);
    let (status, body) = send(app, get_request(&uri, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("between 1 and 1440 minutes"));
}

#[tokio::test]
async fn availability_needs_a_calendar_date() {
    let (app, _dir) = TestContext::new().build();

    let request = get_request("/api/facilities/5/availability?date=03-06-2024", None);
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("expected YYYY-MM-DD"));
}

#[tokio::test]
async fn unknown_facility_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.locations
        .expect_facility_availability()
        .returning(|id, _, _, _| Err(StudioError::not_found("Facility", id)));
    let (app, _dir) = ctx.build();

    let request = get_request("/api/facilities/404/availability?date=2024-06-03", None);
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
