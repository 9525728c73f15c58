use actix_session::Session;
use actix_web::{HttpResponse, http::StatusCode, web::Data};
use chrono::Utc;

use crate::auth::session::{live_auth, theme_preference};
use crate::render::{html, page};
use crate::routes::found;
use crate::theme::ThemeState;

pub async fn home(session: Session, theme_state: Data<ThemeState>) -> HttpResponse {
    if let Some(auth) = live_auth(&session, Utc::now()) {
        return found(auth.role().area());
    }

    let theme = theme_state.resolve(theme_preference(&session));
    let body = r#"<h1>Campus</h1>
<p>Courses, assignments and results in one place.</p>
<p><a href="/courses">Browse courses</a> or <a href="/login">sign in</a> to reach your dashboard.</p>"#;
    html(StatusCode::OK, page("Welcome", theme, None, body))
}
