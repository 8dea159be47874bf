use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::{Session, User};

pub struct SessionContext {
    pub session: Session,
    pub user: Option<User>,
}

impl SessionContext {
    pub fn is_staff(&self) -> bool {
        self.user.as_ref().map(|u| u.is_staff).unwrap_or(false)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the caller's session, if any. Unknown or expired tokens read as
/// anonymous rather than erroring.
pub fn current(conn: &Connection, headers: &HeaderMap) -> anyhow::Result<Option<SessionContext>> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    let Some(session) = queries::get_session(conn, &token)? else {
        return Ok(None);
    };
    let user = match &session.user_id {
        Some(id) => queries::get_user_by_id(conn, id)?,
        None => None,
    };
    Ok(Some(SessionContext { session, user }))
}

pub fn issue_user_session(
    conn: &Connection,
    config: &AppConfig,
    user_id: &str,
) -> anyhow::Result<Session> {
    let session = new_session(config, Some(user_id.to_string()), None);
    queries::create_session(conn, &session)?;
    Ok(session)
}

/// Give a guest a token that can manage the bookings made under `email`.
/// An existing guest session is reused and re-pointed at the email.
pub fn grant_guest_access(
    conn: &Connection,
    config: &AppConfig,
    current: Option<&SessionContext>,
    email: &str,
) -> anyhow::Result<String> {
    if let Some(ctx) = current {
        if ctx.user.is_none() {
            queries::set_session_booking_email(conn, &ctx.session.token, email)?;
            return Ok(ctx.session.token.clone());
        }
    }

    let session = new_session(config, None, Some(email.to_string()));
    queries::create_session(conn, &session)?;
    Ok(session.token)
}

fn new_session(
    config: &AppConfig,
    user_id: Option<String>,
    booking_email: Option<String>,
) -> Session {
    let now = Utc::now().naive_utc();
    Session {
        token: Uuid::new_v4().to_string(),
        user_id,
        booking_email,
        created_at: now,
        expires_at: now + Duration::days(config.session_ttl_days),
    }
}
