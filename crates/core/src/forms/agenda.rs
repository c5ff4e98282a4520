use serde::{Deserialize, Serialize};

use super::{ParseForm, INVALID_DATE, INVALID_DATETIME, INVALID_TIME};
use crate::form::{parse_date, parse_datetime, parse_time, FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::agenda::{AgendaInput, AgendaRecurrenceInput};
use crate::recurrence::{within_span, SPAN_TOO_LONG};

impl ParseForm for AgendaInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let class_id = r.required("class_id", MUST_BE_NUMBER);
        let coach_id = r.required("coach_id", MUST_BE_NUMBER);
        let location_facility_id = r.required("location_facility_id", MUST_BE_NUMBER);
        let time = r.required_with("time", parse_datetime, INVALID_DATETIME);
        let is_show = r.flag("is_show");
        r.finish(AgendaInput {
            class_id,
            coach_id,
            location_facility_id,
            time,
            is_show,
        })
    }
}

impl ParseForm for AgendaRecurrenceInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let class_id = r.required("class_id", MUST_BE_NUMBER);
        let coach_id = r.required("coach_id", MUST_BE_NUMBER);
        let location_facility_id = r.required("location_facility_id", MUST_BE_NUMBER);
        let day_of_week: i16 = r.required("day_of_week", MUST_BE_NUMBER);
        r.check(
            "day_of_week",
            (0..=6).contains(&day_of_week),
            "Must be between 0 (Sunday) and 6 (Saturday)",
        );
        let time = r.required_with("time", parse_time, INVALID_TIME);
        let start_date = r.required_with("start_date", parse_date, INVALID_DATE);
        let end_date = r.required_with("end_date", parse_date, INVALID_DATE);
        if !r.has_error("start_date") {
            r.check("end_date", start_date <= end_date, "Must not be before the start date");
            r.check("end_date", within_span(start_date, end_date), SPAN_TOO_LONG);
        }
        r.finish(AgendaRecurrenceInput {
            class_id,
            coach_id,
            location_facility_id,
            day_of_week,
            time,
            start_date,
            end_date,
        })
    }
}

/// Booking a seat. `user_id` is only read for bookings made by staff on
/// behalf of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingForm {
    pub agenda_id: i64,
    pub user_id: Option<i64>,
}

impl ParseForm for BookingForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let agenda_id = r.required("agenda_id", MUST_BE_NUMBER);
        let user_id = r.optional("user_id", MUST_BE_NUMBER);
        r.finish(BookingForm { agenda_id, user_id })
    }
}
