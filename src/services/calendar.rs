use chrono::Duration;

use crate::models::{Booking, Package};

pub fn generate_ics(booking: &Booking, package: &Package) -> String {
    let starts = booking.starts_at();
    // Block out the package's buffer window, with a one-hour floor for
    // zero-buffer packages.
    let length = std::cmp::max(package.kind().buffer(), Duration::hours(1));

    let dtstart = starts.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (starts + length).format("%Y%m%dT%H%M%S").to_string();
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@detailbook", booking.id);

    let summary = format!("{} Detailing", package.display_name);
    let description = format!(
        "{} detailing for a {} ({} {})",
        package.display_name,
        booking.vehicle.as_str(),
        booking.first_name,
        booking.last_name,
    );

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Detailbook//Bookings//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}
