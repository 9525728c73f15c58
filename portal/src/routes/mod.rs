pub mod courses;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod logout;
pub mod register;
pub mod resources;
pub mod session;
pub mod theme;

pub use courses::*;
pub use dashboard::*;
pub use home::*;
pub use login::*;
pub use logout::*;
pub use register::*;
pub use session::*;
pub use theme::*;

use actix_web::{HttpResponse, Scope, http::header, web};
use models::Role;
use validator::ValidationErrors;

pub const LOGIN_PATH: &str = "/login";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/login", web::get().to(login_form))
        .route("/login", web::post().to(login))
        .route("/register", web::get().to(register_form))
        .route("/register", web::post().to(register))
        .route("/logout", web::post().to(logout))
        .route("/api/session", web::get().to(current_session))
        .route("/courses", web::get().to(browse_courses))
        .route("/theme", web::post().to(set_theme));

    for role in Role::ALL {
        cfg.service(role_scope(role));
    }
}

/// Everything under a role's area. Access is decided by the role gate
/// before any of these handlers run.
fn role_scope(role: Role) -> Scope {
    let scope = web::scope(role.area())
        .route("", web::get().to(dashboard))
        .route("/", web::get().to(dashboard))
        .configure(resources::configure);

    match role {
        Role::Admin => scope.route("/theme", web::post().to(set_site_theme)),
        Role::Student | Role::Lecturer => scope,
    }
}

/// 302 redirect, used when a request is turned away.
pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 303 redirect, used after a successful form post.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// First validation message, in field-name order so the result is stable.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}.", field),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid input.".to_string())
}
