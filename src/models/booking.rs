use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub package: String,
    pub vehicle: VehicleType,
    pub confirmed: bool,
    pub confirmation_token: String,
    pub user_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// The scheduled start instant, in shop-local time.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Suv,
    Truck,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Suv => "suv",
            VehicleType::Truck => "truck",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "car" => Some(VehicleType::Car),
            "suv" => Some(VehicleType::Suv),
            "truck" => Some(VehicleType::Truck),
            _ => None,
        }
    }
}
