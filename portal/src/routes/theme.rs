use actix_session::Session;
use actix_web::{
    HttpRequest, HttpResponse,
    http::header,
    web::{Data, Form},
};
use models::Theme;
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::AuthorizedSession;
use crate::auth::session::set_theme_preference;
use crate::routes::see_other;
use crate::theme::ThemeState;

#[derive(Deserialize)]
pub struct ThemeForm {
    theme: Theme,
}

/// Same-site path to return to; anything else falls back to `/`.
fn return_path(req: &HttpRequest) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| {
            let path = match referer.find("://") {
                Some(scheme_end) => {
                    let rest = &referer[scheme_end + 3..];
                    let host = req.connection_info().host().to_string();
                    rest.strip_prefix(host.as_str())?.to_string()
                }
                None => referer.to_string(),
            };
            (path.starts_with('/') && !path.starts_with("//")).then_some(path)
        })
        .unwrap_or_else(|| "/".to_string())
}

/// Stores the visitor's own preference; the site default is untouched.
pub async fn set_theme(req: HttpRequest, form: Form<ThemeForm>, session: Session) -> HttpResponse {
    if let Err(e) = set_theme_preference(&session, form.theme) {
        error!("Failed to store theme preference: {}", e);
        return HttpResponse::InternalServerError().finish();
    }
    see_other(&return_path(&req))
}

pub async fn set_site_theme(
    auth: AuthorizedSession,
    form: Form<ThemeForm>,
    theme_state: Data<ThemeState>,
) -> HttpResponse {
    if theme_state.set(form.theme) {
        info!(user_id = %auth.0.user_id(), theme = %form.theme, "Site theme updated");
    }
    see_other(auth.0.role().area())
}
