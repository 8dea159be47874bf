use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::models::{
    Addon, Booking, BookingAddon, BusinessHours, Package, Session, User, VehicleType, WeekSchedule,
};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLS: &str = "id, first_name, last_name, email, phone_number, date, time, package, vehicle, confirmed, confirmation_token, user_id, created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!("INSERT INTO bookings ({BOOKING_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"),
        params![
            booking.id,
            booking.first_name,
            booking.last_name,
            booking.email,
            booking.phone_number,
            booking.date.format(DATE_FMT).to_string(),
            booking.time.format(TIME_FMT).to_string(),
            booking.package,
            booking.vehicle.as_str(),
            booking.confirmed as i32,
            booking.confirmation_token,
            booking.user_id,
            booking.created_at.format(DATETIME_FMT).to_string(),
            booking.updated_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All bookings scheduled on the given date, for the conflict scan.
pub fn get_bookings_on_date(conn: &Connection, date: NaiveDate) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE date = ?1 ORDER BY time ASC"
    ))?;

    let rows = stmt.query_map(params![date.format(DATE_FMT).to_string()], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE user_id = ?1 ORDER BY date ASC, time ASC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Bookings made without an account, looked up by the email used at booking time.
pub fn get_guest_bookings(conn: &Connection, email: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings WHERE email = ?1 AND user_id IS NULL ORDER BY date ASC, time ASC"
    ))?;

    let rows = stmt.query_map(params![email], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLS} FROM bookings ORDER BY date DESC, time DESC LIMIT ?1"
    ))?;

    let rows = stmt.query_map(params![limit], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Flip a booking to confirmed if the token is valid and unused. Returns the
/// confirmed booking, or None when the token is unknown or already redeemed.
pub fn redeem_confirmation_token(
    conn: &Connection,
    token: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE confirmation_token = ?1 AND confirmed = 0"),
        params![token],
        |row| Ok(parse_booking_row(row)),
    );

    let mut booking = match result {
        Ok(booking) => booking?,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let now = Utc::now().naive_utc();
    conn.execute(
        "UPDATE bookings SET confirmed = 1, updated_at = ?1 WHERE id = ?2",
        params![now.format(DATETIME_FMT).to_string(), booking.id],
    )?;

    booking.confirmed = true;
    booking.updated_at = now;
    Ok(Some(booking))
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let first_name: String = row.get(1)?;
    let last_name: String = row.get(2)?;
    let email: String = row.get(3)?;
    let phone_number: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    let time_str: String = row.get(6)?;
    let package: String = row.get(7)?;
    let vehicle_str: String = row.get(8)?;
    let confirmed: bool = row.get::<_, i32>(9)? != 0;
    let confirmation_token: String = row.get(10)?;
    let user_id: Option<String> = row.get(11)?;
    let created_at_str: String = row.get(12)?;
    let updated_at_str: String = row.get(13)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .unwrap_or_else(|_| Utc::now().date_naive());
    let time = NaiveTime::parse_from_str(&time_str, TIME_FMT).unwrap_or(NaiveTime::MIN);
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        first_name,
        last_name,
        email,
        phone_number,
        date,
        time,
        package,
        vehicle: VehicleType::parse(&vehicle_str).unwrap_or(VehicleType::Car),
        confirmed,
        confirmation_token,
        user_id,
        created_at,
        updated_at,
    })
}

// ── Booking add-ons ──

pub fn add_booking_addon(
    conn: &Connection,
    booking_id: &str,
    line: &BookingAddon,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO booking_addons (booking_id, addon, quantity, price_at_booking)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            booking_id,
            line.addon,
            line.quantity,
            line.price_at_booking.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking_addons(conn: &Connection, booking_id: &str) -> anyhow::Result<Vec<BookingAddon>> {
    let mut stmt = conn.prepare(
        "SELECT addon, quantity, price_at_booking FROM booking_addons WHERE booking_id = ?1 ORDER BY addon ASC",
    )?;

    let rows = stmt.query_map(params![booking_id], |row| {
        let addon: String = row.get(0)?;
        let quantity: u32 = row.get(1)?;
        let price_str: String = row.get(2)?;
        Ok(BookingAddon {
            addon,
            quantity,
            price_at_booking: price_str.parse::<Decimal>().unwrap_or_default(),
        })
    })?;

    let mut lines = vec![];
    for row in rows {
        lines.push(row?);
    }
    Ok(lines)
}

// ── Packages ──

pub fn get_package(conn: &Connection, name: &str) -> anyhow::Result<Option<Package>> {
    let result = conn.query_row(
        "SELECT name, display_name, price, description FROM packages WHERE name = ?1",
        params![name],
        |row| {
            let price_str: String = row.get(2)?;
            Ok(Package {
                name: row.get(0)?,
                display_name: row.get(1)?,
                price: price_str.parse::<Decimal>().unwrap_or_default(),
                description: row.get(3)?,
            })
        },
    );

    match result {
        Ok(package) => Ok(Some(package)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_packages(conn: &Connection) -> anyhow::Result<Vec<Package>> {
    let mut stmt = conn
        .prepare("SELECT name, display_name, price, description FROM packages ORDER BY price ASC")?;

    let rows = stmt.query_map([], |row| {
        let price_str: String = row.get(2)?;
        Ok(Package {
            name: row.get(0)?,
            display_name: row.get(1)?,
            price: price_str.parse::<Decimal>().unwrap_or_default(),
            description: row.get(3)?,
        })
    })?;

    let mut packages = vec![];
    for row in rows {
        packages.push(row?);
    }
    Ok(packages)
}

pub fn get_vehicle_price(
    conn: &Connection,
    package: &str,
    vehicle: VehicleType,
) -> anyhow::Result<Option<Decimal>> {
    let result = conn.query_row(
        "SELECT price FROM vehicle_prices WHERE package = ?1 AND vehicle = ?2",
        params![package, vehicle.as_str()],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(price_str) => Ok(Some(price_str.parse::<Decimal>().unwrap_or_default())),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_vehicle_prices(
    conn: &Connection,
    package: &str,
) -> anyhow::Result<Vec<(String, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT vehicle, price FROM vehicle_prices WHERE package = ?1 ORDER BY price ASC",
    )?;

    let rows = stmt.query_map(params![package], |row| {
        let vehicle: String = row.get(0)?;
        let price_str: String = row.get(1)?;
        Ok((vehicle, price_str.parse::<Decimal>().unwrap_or_default()))
    })?;

    let mut prices = vec![];
    for row in rows {
        prices.push(row?);
    }
    Ok(prices)
}

// ── Add-ons ──

pub fn get_active_addon(conn: &Connection, name: &str) -> anyhow::Result<Option<Addon>> {
    let result = conn.query_row(
        "SELECT name, display_name, price, description, active FROM addons WHERE name = ?1 AND active = 1",
        params![name],
        |row| Ok(parse_addon_row(row)),
    );

    match result {
        Ok(addon) => Ok(Some(addon?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_active_addons(conn: &Connection) -> anyhow::Result<Vec<Addon>> {
    let mut stmt = conn.prepare(
        "SELECT name, display_name, price, description, active FROM addons WHERE active = 1 ORDER BY price ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_addon_row(row)))?;

    let mut addons = vec![];
    for row in rows {
        addons.push(row??);
    }
    Ok(addons)
}

fn parse_addon_row(row: &rusqlite::Row) -> anyhow::Result<Addon> {
    let price_str: String = row.get(2)?;
    Ok(Addon {
        name: row.get(0)?,
        display_name: row.get(1)?,
        price: price_str.parse::<Decimal>().unwrap_or_default(),
        description: row.get(3)?,
        active: row.get::<_, i32>(4)? != 0,
    })
}

// ── Business hours ──

pub fn list_business_hours(conn: &Connection) -> anyhow::Result<Vec<BusinessHours>> {
    let mut stmt = conn.prepare(
        "SELECT day, opening_time, closing_time, is_open FROM business_hours ORDER BY day ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let day: u8 = row.get(0)?;
        let opening_str: String = row.get(1)?;
        let closing_str: String = row.get(2)?;
        let is_open: bool = row.get::<_, i32>(3)? != 0;
        Ok((day, opening_str, closing_str, is_open))
    })?;

    let mut hours = vec![];
    for row in rows {
        let (day, opening_str, closing_str, is_open) = row?;
        hours.push(BusinessHours {
            day,
            opening_time: NaiveTime::parse_from_str(&opening_str, TIME_FMT)
                .unwrap_or(NaiveTime::MIN),
            closing_time: NaiveTime::parse_from_str(&closing_str, TIME_FMT)
                .unwrap_or(NaiveTime::MIN),
            is_open,
        });
    }
    Ok(hours)
}

pub fn get_week_schedule(conn: &Connection) -> anyhow::Result<WeekSchedule> {
    Ok(WeekSchedule::new(list_business_hours(conn)?))
}

pub fn set_business_hours(conn: &Connection, hours: &BusinessHours) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO business_hours (day, opening_time, closing_time, is_open)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(day) DO UPDATE SET
           opening_time = excluded.opening_time,
           closing_time = excluded.closing_time,
           is_open = excluded.is_open",
        params![
            hours.day,
            hours.opening_time.format(TIME_FMT).to_string(),
            hours.closing_time.format(TIME_FMT).to_string(),
            hours.is_open as i32,
        ],
    )?;
    Ok(())
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, username, password_hash, is_staff, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.email,
            user.username,
            user.password_hash,
            user.is_staff as i32,
            user.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    get_user_where(conn, "email = ?1", email)
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    get_user_where(conn, "id = ?1", id)
}

fn get_user_where(conn: &Connection, clause: &str, value: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT id, email, username, password_hash, is_staff, created_at FROM users WHERE {clause}"),
        params![value],
        |row| {
            let created_at_str: String = row.get(5)?;
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                username: row.get(2)?,
                password_hash: row.get(3)?,
                is_staff: row.get::<_, i32>(4)? != 0,
                created_at: NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
                    .unwrap_or_else(|_| Utc::now().naive_utc()),
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Sessions ──

pub fn create_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, booking_email, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            session.token,
            session.user_id,
            session.booking_email,
            session.created_at.format(DATETIME_FMT).to_string(),
            session.expires_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_session(conn: &Connection, token: &str) -> anyhow::Result<Option<Session>> {
    let now = Utc::now().naive_utc().format(DATETIME_FMT).to_string();
    let result = conn.query_row(
        "SELECT token, user_id, booking_email, created_at, expires_at
         FROM sessions WHERE token = ?1 AND expires_at > ?2",
        params![token, now],
        |row| {
            let created_at_str: String = row.get(3)?;
            let expires_at_str: String = row.get(4)?;
            Ok(Session {
                token: row.get(0)?,
                user_id: row.get(1)?,
                booking_email: row.get(2)?,
                created_at: NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
                    .unwrap_or_else(|_| Utc::now().naive_utc()),
                expires_at: NaiveDateTime::parse_from_str(&expires_at_str, DATETIME_FMT)
                    .unwrap_or_else(|_| Utc::now().naive_utc()),
            })
        },
    );

    match result {
        Ok(session) => Ok(Some(session)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(count > 0)
}

pub fn set_session_booking_email(
    conn: &Connection,
    token: &str,
    email: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE sessions SET booking_email = ?1 WHERE token = ?2",
        params![email, token],
    )?;
    Ok(())
}
