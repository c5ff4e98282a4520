//! Whether a member may take a seat on an agenda.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::credits::can_reserve;
use crate::errors::StudioError;

/// State read, under lock, when a seat is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRequest {
    pub starts_at: NaiveDateTime,
    pub now: NaiveDateTime,
    pub already_booked: bool,
    pub seats_taken: i64,
    pub capacity: i32,
    pub available_credit: i32,
    /// Live bookings of the same class type still waiting for check-in.
    pub outstanding: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("Agenda has already started")]
    Started,
    #[error("You already have a booking for this agenda")]
    AlreadyBooked,
    #[error("Agenda is fully booked")]
    Full,
    #[error("Not enough credit to book this class")]
    NotEnoughCredit,
}

impl From<BookingRejection> for StudioError {
    fn from(rejection: BookingRejection) -> Self {
        match rejection {
            BookingRejection::Started => StudioError::Validation(rejection.to_string()),
            _ => StudioError::Conflict(rejection.to_string()),
        }
    }
}

/// Checks run in order: timing, duplicates, seats, credit.
pub fn check_seat(request: &SeatRequest) -> Result<(), BookingRejection> {
    if request.starts_at <= request.now {
        return Err(BookingRejection::Started);
    }
    if request.already_booked {
        return Err(BookingRejection::AlreadyBooked);
    }
    if request.seats_taken >= i64::from(request.capacity) {
        return Err(BookingRejection::Full);
    }
    if !can_reserve(request.available_credit, request.outstanding) {
        return Err(BookingRejection::NotEnoughCredit);
    }
    Ok(())
}
