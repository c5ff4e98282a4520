use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;

/// A scheduled class session. `time` is studio wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agenda {
    pub id: i64,
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub time: NaiveDateTime,
    pub recurrence_id: Option<i64>,
    pub is_show: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaInput {
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub time: NaiveDateTime,
    pub is_show: bool,
}

/// Agenda row as shown on the schedule: names resolved and seats counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaListing {
    pub id: i64,
    pub time: NaiveDateTime,
    pub class_id: i64,
    pub class_name: String,
    pub class_type_id: i64,
    pub duration_minutes: i32,
    pub coach_id: i64,
    pub coach_name: String,
    pub location_facility_id: i64,
    pub facility_name: String,
    pub capacity: i32,
    pub booked: i64,
}

impl AgendaListing {
    pub fn is_full(&self) -> bool {
        self.booked >= i64::from(self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaRecurrence {
    pub id: i64,
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub day_of_week: i16,
    pub time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaRecurrenceInput {
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub day_of_week: i16,
    pub time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Outcome of materialising a recurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceResult {
    pub recurrence: AgendaRecurrence,
    pub created: usize,
    /// Occurrences left out because the facility was closed or taken.
    pub skipped: Vec<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    Cancelled,
}

text_enum!(BookingStatus, "booking status", {
    Booked => "booked",
    CheckedIn => "checked_in",
    Cancelled => "cancelled",
});

impl BookingStatus {
    /// A booking holds a seat until it is cancelled.
    pub fn holds_seat(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Booked, BookingStatus::CheckedIn)
                | (BookingStatus::Booked, BookingStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaBooking {
    pub id: i64,
    pub agenda_id: i64,
    pub user_id: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
