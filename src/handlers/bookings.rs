use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingAddon, VehicleType};
use crate::services::sessions::SessionContext;
use crate::services::{admission, calendar, notifications, sessions};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date: String,
    pub time: String,
    pub package: String,
    pub vehicle: String,
    #[serde(default)]
    pub addons: Vec<AddonSelection>,
}

#[derive(Deserialize)]
pub struct AddonSelection {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    date: String,
    time: String,
    package: String,
    vehicle: &'static str,
    confirmed: bool,
    price: Decimal,
    addons: Vec<BookingAddon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
}

fn booking_response(conn: &Connection, booking: &Booking) -> anyhow::Result<BookingResponse> {
    let addons = queries::get_booking_addons(conn, &booking.id)?;

    let base = match queries::get_vehicle_price(conn, &booking.package, booking.vehicle)? {
        Some(price) => price,
        None => queries::get_package(conn, &booking.package)?
            .map(|p| p.price)
            .unwrap_or_default(),
    };
    let price = base + addons.iter().map(|l| l.line_total()).sum::<Decimal>();

    Ok(BookingResponse {
        id: booking.id.clone(),
        first_name: booking.first_name.clone(),
        last_name: booking.last_name.clone(),
        email: booking.email.clone(),
        phone_number: booking.phone_number.clone(),
        date: booking.date.format("%Y-%m-%d").to_string(),
        time: booking.time.format("%H:%M").to_string(),
        package: booking.package.clone(),
        vehicle: booking.vehicle.as_str(),
        confirmed: booking.confirmed,
        price,
        addons,
        session_token: None,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {s}")))
}

fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("invalid time: {s}")))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let date = parse_date(&req.date)?;
    let time = parse_time(&req.time)?;
    let vehicle = VehicleType::parse(&req.vehicle)
        .ok_or_else(|| AppError::Validation(format!("unknown vehicle type: {}", req.vehicle)))?;

    let (response, booking, package) = {
        let db = state.db.lock().unwrap();

        let package = queries::get_package(&db, &req.package)?
            .ok_or_else(|| AppError::Validation(format!("unknown package: {}", req.package)))?;

        let mut selections = vec![];
        for sel in &req.addons {
            if sel.quantity == 0 {
                return Err(AppError::Validation(
                    "add-on quantity must be at least 1".to_string(),
                ));
            }
            let addon = queries::get_active_addon(&db, &sel.name)?
                .ok_or_else(|| AppError::Validation(format!("unknown add-on: {}", sel.name)))?;
            selections.push(BookingAddon {
                addon: addon.name,
                quantity: sel.quantity,
                price_at_booking: addon.price,
            });
        }

        // The admission check and the insert run on the same locked
        // connection; nothing can sneak in between them in-process.
        let schedule = queries::get_week_schedule(&db)?;
        let existing = queries::get_bookings_on_date(&db, date)?;
        admission::check_booking(
            state.config.local_now(),
            date,
            time,
            package.kind(),
            &schedule,
            &existing,
        )?;

        let ctx = sessions::current(&db, &headers)?;
        let user_id = ctx
            .as_ref()
            .and_then(|c| c.user.as_ref())
            .map(|u| u.id.clone());

        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            date,
            time,
            package: package.name.clone(),
            vehicle,
            confirmed: false,
            confirmation_token: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        queries::create_booking(&db, &booking)?;
        for line in &selections {
            queries::add_booking_addon(&db, &booking.id, line)?;
        }

        let mut response = booking_response(&db, &booking)?;
        if user_id.is_none() {
            response.session_token = Some(sessions::grant_guest_access(
                &db,
                &state.config,
                ctx.as_ref(),
                &booking.email,
            )?);
        }

        (response, booking, package)
    };

    tracing::info!(
        booking_id = %booking.id,
        date = %date,
        time = %time.format("%H:%M"),
        package = %package.name,
        "booking admitted"
    );
    notifications::send_confirmation_request(&state, &booking, &package).await;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

// GET /api/bookings (staff only)
#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let db = state.db.lock().unwrap();

    let ctx = sessions::current(&db, &headers)?.ok_or(AppError::Unauthorized)?;
    if !ctx.is_staff() {
        return Err(AppError::Forbidden);
    }

    let bookings = queries::get_all_bookings(&db, query.limit.unwrap_or(50))?;
    let mut response = vec![];
    for booking in &bookings {
        response.push(booking_response(&db, booking)?);
    }
    Ok(Json(response))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let db = state.db.lock().unwrap();

    let booking = queries::get_booking(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    let ctx = sessions::current(&db, &headers)?;
    authorize_delete(&booking, ctx.as_ref())?;

    admission::check_cancellation(state.config.local_now(), booking.starts_at())?;

    queries::delete_booking(&db, &id)?;
    tracing::info!(booking_id = %id, "booking cancelled");
    Ok(StatusCode::NO_CONTENT)
}

fn authorize_delete(booking: &Booking, ctx: Option<&SessionContext>) -> Result<(), AppError> {
    let Some(ctx) = ctx else {
        return Err(AppError::Unauthorized);
    };

    if ctx.is_staff() {
        return Ok(());
    }

    if let Some(user) = &ctx.user {
        if booking.user_id.as_deref() == Some(user.id.as_str()) {
            return Ok(());
        }
        return Err(AppError::Forbidden);
    }

    // Guest sessions may only touch guest bookings made under their email.
    if booking.user_id.is_none()
        && ctx.session.booking_email.as_deref() == Some(booking.email.as_str())
    {
        return Ok(());
    }

    Err(AppError::Forbidden)
}

// GET /api/bookings/confirm?token=
#[derive(Deserialize)]
pub struct ConfirmQuery {
    pub token: String,
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (booking, package) = {
        let db = state.db.lock().unwrap();

        let booking = queries::redeem_confirmation_token(&db, &query.token)?
            .ok_or_else(|| AppError::NotFound("confirmation token".to_string()))?;
        let package = queries::get_package(&db, &booking.package)?.ok_or_else(|| {
            anyhow::anyhow!("package {} missing for booking {}", booking.package, booking.id)
        })?;

        (booking, package)
    };

    tracing::info!(booking_id = %booking.id, "booking confirmed");
    notifications::send_booking_confirmed(&state, &booking, &package).await;

    Ok(Json(serde_json::json!({ "detail": "booking confirmed" })))
}

// GET /api/bookings/user
pub async fn user_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let db = state.db.lock().unwrap();

    let ctx = sessions::current(&db, &headers)?.ok_or(AppError::Unauthorized)?;
    let user = ctx.user.ok_or(AppError::Unauthorized)?;

    let bookings = queries::get_bookings_for_user(&db, &user.id)?;
    let mut response = vec![];
    for booking in &bookings {
        response.push(booking_response(&db, booking)?);
    }
    Ok(Json(response))
}

// POST /api/bookings/guest
#[derive(Deserialize)]
pub struct GuestLookupRequest {
    pub email: String,
}

pub async fn guest_bookings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuestLookupRequest>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let db = state.db.lock().unwrap();

    let bookings = queries::get_guest_bookings(&db, &req.email)?;
    if bookings.is_empty() {
        return Err(AppError::Validation(
            "no bookings found for this email".to_string(),
        ));
    }

    let mut response = vec![];
    for booking in &bookings {
        response.push(booking_response(&db, booking)?);
    }
    Ok(Json(response))
}

// GET /api/bookings/:id/calendar.ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let db = state.db.lock().unwrap();

    let booking = queries::get_booking(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    let package = queries::get_package(&db, &booking.package)?.ok_or_else(|| {
        anyhow::anyhow!("package {} missing for booking {}", booking.package, booking.id)
    })?;

    let ics = calendar::generate_ics(&booking, &package);
    let filename = format!("booking-{id}.ics");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/calendar; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
