use actix_session::Session;
use actix_web::{HttpResponse, http::StatusCode, web::Data};
use chrono::Utc;
use models::{Course, ResourceKind};

use crate::auth::session::{live_auth, theme_preference};
use crate::backend::BackendClient;
use crate::render::{html, page};
use crate::shell::Panel;
use crate::theme::ThemeState;

/// Public catalogue. Signed-in visitors browse with their credentials.
pub async fn browse_courses(
    session: Session,
    backend: Data<BackendClient>,
    theme_state: Data<ThemeState>,
) -> HttpResponse {
    let auth = live_auth(&session, Utc::now());
    let courses = backend
        .list::<Course>(ResourceKind::Courses, auth.as_ref(), &[])
        .await;
    let panel = Panel::from_fetch(ResourceKind::Courses, courses);

    let theme = theme_state.resolve(theme_preference(&session));
    let body = format!("<h1>Courses</h1>{}", panel.render("Course catalogue"));
    html(StatusCode::OK, page("Courses", theme, auth.as_ref(), &body))
}
