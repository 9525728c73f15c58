use actix_session::Session;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use models::Role;
use serde::Serialize;

use crate::auth::session::live_auth;

#[derive(Serialize)]
struct SessionUser<'a> {
    id: &'a str,
    email: &'a str,
    name: &'a str,
    role: Role,
}

#[derive(Serialize)]
struct SessionView<'a> {
    user: SessionUser<'a>,
    expires: DateTime<Utc>,
}

/// `{ user, expires }` for a live session, `{}` otherwise.
pub async fn current_session(session: Session) -> HttpResponse {
    match live_auth(&session, Utc::now()) {
        Some(auth) => HttpResponse::Ok().json(SessionView {
            user: SessionUser {
                id: auth.user_id(),
                email: auth.email(),
                name: auth.name(),
                role: auth.role(),
            },
            expires: auth.expires_at(),
        }),
        None => HttpResponse::Ok().json(serde_json::json!({})),
    }
}
