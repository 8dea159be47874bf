use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::hours::{day_index, day_name};
use crate::models::{Booking, PackageKind, WeekSchedule};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AdmissionError {
    #[error("cannot book a date in the past")]
    InPast,

    #[error("we are closed on {day}")]
    Closed { day: &'static str },

    #[error("bookings on {day} must be between {hours}")]
    OutsideHours { day: &'static str, hours: String },

    #[error("a booking already exists within the restricted time")]
    Conflict,

    #[error("bookings can only be cancelled at least 24 hours in advance")]
    CancelTooLate,
}

/// Decide whether a requested (date, time, package) may be admitted.
///
/// Checks run in order: past, business hours, then conflicts against the
/// existing bookings on the requested date. The conflict window uses only the
/// NEW booking's package buffer; the existing booking's buffer is not
/// consulted, so the relation is deliberately asymmetric.
pub fn check_booking(
    now: NaiveDateTime,
    date: NaiveDate,
    time: NaiveTime,
    package: PackageKind,
    schedule: &WeekSchedule,
    existing: &[Booking],
) -> Result<(), AdmissionError> {
    let requested = date.and_time(time);
    if requested <= now {
        return Err(AdmissionError::InPast);
    }

    let weekday = date.weekday();
    let hours = schedule.for_weekday(weekday).ok_or(AdmissionError::Closed {
        day: day_name(day_index(weekday)),
    })?;
    if !hours.is_open {
        return Err(AdmissionError::Closed {
            day: hours.day_name(),
        });
    }
    // Inclusive on both ends: booking exactly at opening or closing is fine.
    if time < hours.opening_time || time > hours.closing_time {
        return Err(AdmissionError::OutsideHours {
            day: hours.day_name(),
            hours: hours.hours_display(),
        });
    }

    let buffer = package.buffer();
    for booking in existing {
        if booking.date != date {
            continue;
        }
        let separation = (booking.starts_at() - requested).abs();
        // Boundary-equal separation still conflicts (|dt| <= buffer).
        if separation <= buffer {
            return Err(AdmissionError::Conflict);
        }
    }

    Ok(())
}

/// A booking may only be cancelled while its start is at least 24 hours away.
pub fn check_cancellation(
    now: NaiveDateTime,
    starts_at: NaiveDateTime,
) -> Result<(), AdmissionError> {
    if starts_at - now < Duration::hours(24) {
        return Err(AdmissionError::CancelTooLate);
    }
    Ok(())
}
