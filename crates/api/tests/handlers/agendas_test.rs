use axum::http::StatusCode;
use chrono::{NaiveDate, TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use studio_core::{
    booking::BookingRejection,
    errors::StudioError,
    models::agenda::{AgendaBooking, AgendaRecurrence, BookingStatus, RecurrenceResult},
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn booking(id: i64, user_id: i64, status: BookingStatus) -> AgendaBooking {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    AgendaBooking {
        id,
        agenda_id: 11,
        user_id,
        status,
        created_at: at,
        updated_at: at,
    }
}

#[tokio::test]
async fn member_books_for_themselves() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_book()
        .with(eq(11), eq(7))
        .times(1)
        .returning(|_, user_id| Ok(booking(5, user_id, BookingStatus::Booked)));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/bookings", Some(MEMBER_TOKEN), "agenda_id=11");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "booked");
}

#[tokio::test]
async fn member_cannot_book_for_someone_else() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/bookings",
        Some(MEMBER_TOKEN),
        "agenda_id=11&user_id=8",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");
    assert_eq!(body["form"]["user_id"], "8");
}

#[tokio::test]
async fn admin_books_on_behalf_of_a_member() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_book()
        .with(eq(11), eq(8))
        .times(1)
        .returning(|_, user_id| Ok(booking(6, user_id, BookingStatus::Booked)));
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/bookings",
        Some(ADMIN_TOKEN),
        "agenda_id=11&user_id=8",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], 8);
}

#[tokio::test]
async fn full_class_is_a_conflict() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_book()
        .returning(|_, _| Err(StudioError::Conflict("Class is full".into())));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/bookings", Some(MEMBER_TOKEN), "agenda_id=11");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Conflict: Class is full");
}

#[rstest]
#[case(BookingRejection::Started, StatusCode::BAD_REQUEST)]
#[case(BookingRejection::AlreadyBooked, StatusCode::CONFLICT)]
#[case(BookingRejection::NotEnoughCredit, StatusCode::CONFLICT)]
#[tokio::test]
async fn booking_rejections_reach_the_form(
    #[case] rejection: BookingRejection,
    #[case] expected: StatusCode,
) {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_book()
        .times(1)
        .returning(move |_, _| Err(rejection.into()));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/bookings", Some(MEMBER_TOKEN), "agenda_id=11");
    let (status, body) = send(app, request).await;

    assert_eq!(status, expected);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .ends_with(&rejection.to_string()));
    assert_eq!(body["form"]["agenda_id"], "11");
}

#[tokio::test]
async fn recurrence_longer_than_a_year_is_refused() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/agenda-recurrences",
        Some(ADMIN_TOKEN),
        "class_id=1&coach_id=2&location_facility_id=3&day_of_week=1\
         &time=07%3A00&start_date=2024-01-01&end_date=9999-12-31",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["end_date"][0], "Must be within a year of the start date");
}

#[tokio::test]
async fn recurrence_with_bad_class_id_is_a_field_error() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/agenda-recurrences",
        Some(ADMIN_TOKEN),
        "class_id=yoga&coach_id=2&location_facility_id=3&day_of_week=1\
         &time=07%3A00&start_date=2024-05-01&end_date=2024-06-30",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["class_id"][0], "Must be a number");
    assert_eq!(body["form"]["class_id"], "yoga");
}

#[tokio::test]
async fn recurrence_reports_skipped_occurrences() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_create_agenda_recurrence()
        .times(1)
        .returning(|input| {
            Ok(RecurrenceResult {
                recurrence: AgendaRecurrence {
                    id: 4,
                    class_id: input.class_id,
                    coach_id: input.coach_id,
                    location_facility_id: input.location_facility_id,
                    day_of_week: input.day_of_week,
                    time: input.time,
                    start_date: input.start_date,
                    end_date: input.end_date,
                    created_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
                },
                created: 8,
                skipped: vec![NaiveDate::from_ymd_opt(2024, 5, 20)
                    .unwrap()
                    .and_time(input.time)],
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/agenda-recurrences",
        Some(ADMIN_TOKEN),
        "class_id=1&coach_id=2&location_facility_id=3&day_of_week=1\
         &time=07%3A00&start_date=2024-05-01&end_date=2024-06-30",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "8 agendas scheduled, 1 skipped");
    assert_eq!(body["data"]["skipped"][0], "2024-05-20T07:00:00");
}

#[tokio::test]
async fn members_cancel_only_their_own_bookings() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_get_booking()
        .with(eq(5))
        .returning(|id| Ok(booking(id, 8, BookingStatus::Booked)));
    ctx.agendas.expect_cancel_booking().never();
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/bookings/5/cancel", Some(MEMBER_TOKEN), "");
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_checks_in_a_booking() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.agendas
        .expect_check_in()
        .with(eq(5))
        .times(1)
        .returning(|id| Ok(booking(id, 7, BookingStatus::CheckedIn)));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/bookings/5/check-in", Some(ADMIN_TOKEN), "");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "checked_in");
}

#[tokio::test]
async fn agenda_range_must_be_ordered() {
    let (app, _dir) = TestContext::new().build();

    let request = get_request("/api/agendas?from=2024-05-02&to=2024-05-01", None);
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn agenda_range_is_forwarded() {
    let mut ctx = TestContext::new();
    ctx.agendas
        .expect_list_agendas()
        .withf(|from, to| {
            from.to_string() == "2024-05-01 00:00:00" && to.to_string() == "2024-05-08 00:00:00"
        })
        .times(1)
        .returning(|_, _| Ok(vec![]));
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/agendas?from=2024-05-01", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}
