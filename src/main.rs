use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use detailbook::config::AppConfig;
use detailbook::db;
use detailbook::handlers;
use detailbook::services::mailer::http::HttpApiMailer;
use detailbook::services::mailer::{LogMailer, Mailer};
use detailbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let mailer: Box<dyn Mailer> = if config.mail_api_key.is_empty() {
        tracing::info!("no MAIL_API_KEY set, emails will be logged only");
        Box::new(LogMailer)
    } else {
        tracing::info!("sending mail via {}", config.mail_api_url);
        Box::new(HttpApiMailer::new(
            config.mail_api_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        ))
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        mailer,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/confirm",
            get(handlers::bookings::confirm_booking),
        )
        .route("/api/bookings/user", get(handlers::bookings::user_bookings))
        .route(
            "/api/bookings/guest",
            post(handlers::bookings::guest_bookings),
        )
        .route(
            "/api/bookings/:id",
            delete(handlers::bookings::delete_booking),
        )
        .route(
            "/api/bookings/:id/calendar.ics",
            get(handlers::bookings::download_ics),
        )
        .route("/api/business-hours", get(handlers::hours::list_hours))
        .route("/api/packages", get(handlers::packages::list_packages))
        .route("/api/addons", get(handlers::packages::list_addons))
        .route("/api/users/register", post(handlers::users::register))
        .route("/api/users/login", post(handlers::users::login))
        .route("/api/users/logout", post(handlers::users::logout))
        .route("/api/users/user-info", get(handlers::users::user_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
