use crate::models::{Booking, Package};
use crate::state::AppState;

pub async fn send_confirmation_request(state: &AppState, booking: &Booking, package: &Package) {
    let confirm_url = format!(
        "{}/confirm-booking/{}",
        state.config.frontend_url, booking.confirmation_token
    );
    let body = format!(
        "Hi {},\n\n\
         We received your {} booking for {} at {}.\n\
         Please confirm your booking by visiting:\n\n\
         {}\n\n\
         If you did not make this booking, you can ignore this email.\n",
        booking.first_name,
        package.display_name,
        booking.date.format("%A, %B %d, %Y"),
        booking.time.format("%H:%M"),
        confirm_url,
    );
    deliver(state, &booking.email, "Confirm Your Booking", &body).await;
}

pub async fn send_booking_confirmed(state: &AppState, booking: &Booking, package: &Package) {
    let body = format!(
        "Hi {},\n\n\
         Your {} booking on {} at {} is confirmed.\n\
         See you then!\n",
        booking.first_name,
        package.display_name,
        booking.date.format("%A, %B %d, %Y"),
        booking.time.format("%H:%M"),
    );
    deliver(state, &booking.email, "Your Booking is Confirmed", &body).await;
}

// Email failures never block the request path; they are logged and dropped.
async fn deliver(state: &AppState, to: &str, subject: &str, body: &str) {
    if let Err(e) = state.mailer.send(to, subject, body).await {
        tracing::warn!(error = %e, to = %to, subject = %subject, "failed to send email");
    }
}
