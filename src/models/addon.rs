use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Addon {
    pub name: String,
    pub display_name: String,
    pub price: Decimal,
    pub description: String,
    pub active: bool,
}

/// An add-on attached to a booking, with the price captured at submission
/// time so later price edits don't change what the customer was quoted.
#[derive(Debug, Clone, Serialize)]
pub struct BookingAddon {
    pub addon: String,
    pub quantity: u32,
    pub price_at_booking: Decimal,
}

impl BookingAddon {
    pub fn line_total(&self) -> Decimal {
        self.price_at_booking * Decimal::from(self.quantity)
    }
}
