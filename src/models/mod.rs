pub mod addon;
pub mod booking;
pub mod hours;
pub mod package;
pub mod user;

pub use addon::{Addon, BookingAddon};
pub use booking::{Booking, VehicleType};
pub use hours::{BusinessHours, WeekSchedule};
pub use package::{Package, PackageKind};
pub use user::{Session, User};
