use actix_session::Session;
use actix_web::{HttpResponse, http::StatusCode, web::Data};
use tracing::instrument;

use crate::auth::AuthorizedSession;
use crate::auth::session::theme_preference;
use crate::backend::BackendClient;
use crate::render::{html, page};
use crate::shell;
use crate::theme::ThemeState;

/// Dashboard of the area the role gate admitted the viewer to.
#[instrument(skip_all, fields(user_id = %auth.0.user_id(), role = %auth.0.role()))]
pub async fn dashboard(
    auth: AuthorizedSession,
    backend: Data<BackendClient>,
    theme_state: Data<ThemeState>,
    session: Session,
) -> HttpResponse {
    let AuthorizedSession(auth) = auth;
    let data = shell::load(&backend, &auth).await;

    let theme = theme_state.resolve(theme_preference(&session));
    let title = shell::layout(auth.role()).heading;
    html(
        StatusCode::OK,
        page(title, theme, Some(&auth), &shell::render(&auth, &data)),
    )
}
