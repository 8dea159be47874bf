pub mod bookings;
pub mod health;
pub mod hours;
pub mod packages;
pub mod users;
