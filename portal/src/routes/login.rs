use actix_session::{Session, SessionInsertError};
use actix_web::{
    HttpResponse,
    error::InternalError,
    http::StatusCode,
    web::{Data, Form, Query},
};
use chrono::Utc;
use models::{Credentials, SessionAuth, Theme, UserEmail};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::session::{SessionTtl, establish, forget_auth, theme_preference};
use crate::backend::{BackendClient, BackendError};
use crate::error::error_chain_fmt;
use crate::render::{escape, html, inline_error, page};
use crate::routes::{first_message, see_other};
use crate::theme::ThemeState;

pub const AUTHENTICATION_FAILED: &str = "Authentication failed. Please try again.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";
pub const REGISTERED_NOTICE: &str = "Account created. Please sign in.";

#[derive(thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(String),

    #[error("Backend refused the credentials")]
    InvalidCredentials(#[source] BackendError),

    #[error("Credential exchange failed")]
    Backend(#[source] BackendError),

    #[error(transparent)]
    SessionInsertError(#[from] SessionInsertError),
}

impl std::fmt::Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl LoginError {
    fn user_message(&self) -> &str {
        match self {
            Self::Validation(message) => message.as_str(),
            Self::InvalidCredentials(_) => AUTHENTICATION_FAILED,
            Self::Backend(_) | Self::SessionInsertError(_) => GENERIC_FAILURE,
        }
    }
}

impl From<BackendError> for LoginError {
    fn from(e: BackendError) -> Self {
        if e.is_unauthorized() {
            Self::InvalidCredentials(e)
        } else {
            Self::Backend(e)
        }
    }
}

impl LoginError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::SessionInsertError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The login page showing this error, rendered in `theme`.
    fn into_page(self, theme: Theme) -> InternalError<Self> {
        let page = html(
            self.status_code(),
            login_page(theme, Some(self.user_message()), None),
        );
        InternalError::from_response(self, page)
    }
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    password: String,
}

impl LoginForm {
    /// Client-side checks; nothing reaches the backend unless they pass.
    fn parse(self) -> Result<Credentials, LoginError> {
        let email = UserEmail::parse(&self.email).map_err(LoginError::Validation)?;
        self.validate()
            .map_err(|e| LoginError::Validation(first_message(&e)))?;
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

#[derive(Deserialize)]
pub struct LoginQuery {
    registered: Option<String>,
}

pub fn login_page(theme: Theme, error: Option<&str>, notice: Option<&str>) -> String {
    let error = error.map(inline_error).unwrap_or_default();
    let notice = notice
        .map(|notice| format!(r#"<p class="notice">{}</p>"#, escape(notice)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Sign in</h1>
{notice}{error}
<form method="post" action="/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>
<p>No account yet? <a href="/register">Register</a></p>"#
    );
    page("Sign in", theme, None, &body)
}

pub async fn login_form(
    query: Query<LoginQuery>,
    session: Session,
    theme_state: Data<ThemeState>,
) -> HttpResponse {
    let theme = theme_state.resolve(theme_preference(&session));
    let notice = query.registered.as_ref().map(|_| REGISTERED_NOTICE);
    html(StatusCode::OK, login_page(theme, None, notice))
}

async fn sign_in(
    form: LoginForm,
    backend: &BackendClient,
    session: &Session,
    ttl: &SessionTtl,
) -> Result<SessionAuth, LoginError> {
    let credentials = form.parse()?;
    let response = backend.authenticate(&credentials).await?;
    let auth = SessionAuth::issue(response.user, response.token, ttl.0, Utc::now());
    establish(session, &auth)?;
    Ok(auth)
}

/// Exchanges credentials for a session. Any failure leaves the client
/// without a session and re-renders the login page with the reason.
#[instrument(
    skip(form, backend, session, ttl, theme_state),
    fields(user_id = tracing::field::Empty)
)]
pub async fn login(
    form: Form<LoginForm>,
    backend: Data<BackendClient>,
    session: Session,
    ttl: Data<SessionTtl>,
    theme_state: Data<ThemeState>,
) -> Result<HttpResponse, InternalError<LoginError>> {
    match sign_in(form.into_inner(), &backend, &session, &ttl).await {
        Ok(auth) => {
            tracing::Span::current().record("user_id", auth.user_id());
            info!(role = %auth.role(), "Signed in");
            Ok(see_other(auth.role().area()))
        }
        Err(e) => {
            forget_auth(&session);
            warn!(error = ?e, "Sign-in failed");
            let theme = theme_state.resolve(theme_preference(&session));
            Err(e.into_page(theme))
        }
    }
}
