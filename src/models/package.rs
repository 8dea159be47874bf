use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub name: String,
    pub display_name: String,
    /// Base price for a car; larger vehicles are priced per vehicle_prices.
    pub price: Decimal,
    pub description: String,
}

impl Package {
    pub fn kind(&self) -> PackageKind {
        PackageKind::from_name(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Interior,
    Exterior,
    InteriorExterior,
    Other,
}

impl PackageKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "interior" => PackageKind::Interior,
            "exterior" => PackageKind::Exterior,
            "interior_exterior" => PackageKind::InteriorExterior,
            _ => PackageKind::Other,
        }
    }

    /// Minimum separation enforced between a new booking of this package and
    /// any other booking on the same date.
    pub fn buffer(&self) -> Duration {
        match self {
            PackageKind::Interior => Duration::minutes(180),
            PackageKind::Exterior => Duration::minutes(60),
            PackageKind::InteriorExterior => Duration::minutes(210),
            PackageKind::Other => Duration::zero(),
        }
    }
}
