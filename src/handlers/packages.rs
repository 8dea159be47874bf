use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Addon;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PackageResponse {
    name: String,
    display_name: String,
    description: String,
    price: Decimal,
    vehicle_prices: Vec<VehiclePriceResponse>,
}

#[derive(Serialize)]
pub struct VehiclePriceResponse {
    vehicle: String,
    price: Decimal,
}

// GET /api/packages
pub async fn list_packages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PackageResponse>>, AppError> {
    let db = state.db.lock().unwrap();

    let mut response = vec![];
    for package in queries::list_packages(&db)? {
        let vehicle_prices = queries::list_vehicle_prices(&db, &package.name)?
            .into_iter()
            .map(|(vehicle, price)| VehiclePriceResponse { vehicle, price })
            .collect();

        response.push(PackageResponse {
            name: package.name,
            display_name: package.display_name,
            description: package.description,
            price: package.price,
            vehicle_prices,
        });
    }

    Ok(Json(response))
}

// GET /api/addons
pub async fn list_addons(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Addon>>, AppError> {
    let db = state.db.lock().unwrap();
    let addons = queries::list_active_addons(&db)?;
    Ok(Json(addons))
}
