use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BusinessHoursResponse {
    day: u8,
    day_name: &'static str,
    opening_time: String,
    closing_time: String,
    is_open: bool,
}

// GET /api/business-hours
pub async fn list_hours(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BusinessHoursResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let hours = queries::list_business_hours(&db)?;

    let response = hours
        .into_iter()
        .map(|h| BusinessHoursResponse {
            day: h.day,
            day_name: h.day_name(),
            opening_time: h.opening_time.format("%H:%M").to_string(),
            closing_time: h.closing_time.format("%H:%M").to_string(),
            is_open: h.is_open,
        })
        .collect();

    Ok(Json(response))
}
