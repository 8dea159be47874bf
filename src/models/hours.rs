use chrono::{NaiveTime, Weekday};

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Opening hours for a single weekday. `day` is 0-indexed from Monday,
/// matching the unique per-day rows in the business_hours table.
#[derive(Debug, Clone)]
pub struct BusinessHours {
    pub day: u8,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub is_open: bool,
}

impl BusinessHours {
    pub fn day_name(&self) -> &'static str {
        day_name(self.day)
    }

    pub fn hours_display(&self) -> String {
        format!(
            "{} - {}",
            self.opening_time.format("%H:%M"),
            self.closing_time.format("%H:%M")
        )
    }
}

pub fn day_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("Unknown")
}

/// Immutable weekday -> hours lookup, loaded once per admission check.
/// A weekday without a row is treated as closed.
#[derive(Debug, Clone, Default)]
pub struct WeekSchedule {
    days: [Option<BusinessHours>; 7],
}

impl WeekSchedule {
    pub fn new(rows: Vec<BusinessHours>) -> Self {
        let mut days: [Option<BusinessHours>; 7] = Default::default();
        for row in rows {
            if let Some(slot) = days.get_mut(row.day as usize) {
                *slot = Some(row);
            }
        }
        Self { days }
    }

    pub fn for_weekday(&self, weekday: Weekday) -> Option<&BusinessHours> {
        self.days[day_index(weekday) as usize].as_ref()
    }
}
