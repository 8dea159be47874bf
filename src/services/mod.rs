pub mod admission;
pub mod calendar;
pub mod mailer;
pub mod notifications;
pub mod sessions;
