use actix_session::Session;
use actix_web::{
    HttpResponse,
    error::InternalError,
    http::StatusCode,
    web::{Data, Form},
};
use models::{Registration, Role, Theme, UserEmail};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::session::theme_preference;
use crate::backend::{BackendClient, BackendError};
use crate::error::error_chain_fmt;
use crate::render::{html, inline_error, page};
use crate::routes::{GENERIC_FAILURE, first_message, see_other};
use crate::theme::ThemeState;

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Validation(String),

    #[error("Registration rejected")]
    Rejected(#[source] BackendError),

    #[error("Registration failed")]
    Backend(#[source] BackendError),
}

impl std::fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<BackendError> for RegisterError {
    fn from(e: BackendError) -> Self {
        if matches!(e, BackendError::Rejected { status, .. } if (400..500).contains(&status)) {
            Self::Rejected(e)
        } else {
            Self::Backend(e)
        }
    }
}

impl RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(BackendError::Rejected { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Rejected(_) | Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The registration page showing this error, rendered in `theme`.
    fn into_page(self, theme: Theme) -> InternalError<Self> {
        let message = match &self {
            Self::Validation(message) => message.as_str(),
            // The backend's own wording is shown as-is.
            Self::Rejected(BackendError::Rejected { message, .. }) => message.as_str(),
            Self::Rejected(_) | Self::Backend(_) => GENERIC_FAILURE,
        };
        let page = html(self.status_code(), register_page(theme, Some(message)));
        InternalError::from_response(self, page)
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Name is required."))]
    name: String,
    email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    password: String,
    #[serde(rename = "confirmPassword", alias = "confirm_password")]
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    confirm_password: String,
    #[serde(default)]
    role: Option<String>,
}

impl RegisterForm {
    /// Every check runs locally, before the backend is contacted.
    fn parse(self) -> Result<Registration, RegisterError> {
        self.validate()
            .map_err(|e| RegisterError::Validation(first_message(&e)))?;
        let email = UserEmail::parse(&self.email).map_err(RegisterError::Validation)?;
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Role::Student,
            Some(requested) => match Role::try_from(requested) {
                Ok(Role::Admin) => {
                    return Err(RegisterError::Validation(
                        "Administrator accounts cannot be self-registered.".to_string(),
                    ));
                }
                Ok(role) => role,
                Err(e) => return Err(RegisterError::Validation(e)),
            },
        };

        Ok(Registration {
            name: self.name.trim().to_string(),
            email,
            password: self.password,
            role,
        })
    }
}

pub fn register_page(theme: Theme, error: Option<&str>) -> String {
    let error = error.map(inline_error).unwrap_or_default();
    let body = format!(
        r#"<h1>Create an account</h1>
{error}
<form method="post" action="/register">
<label>Name <input type="text" name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirmPassword" required></label>
<label>I am a
<select name="role"><option value="student">Student</option><option value="lecturer">Lecturer</option></select>
</label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Sign in</a></p>"#
    );
    page("Register", theme, None, &body)
}

pub async fn register_form(session: Session, theme_state: Data<ThemeState>) -> HttpResponse {
    let theme = theme_state.resolve(theme_preference(&session));
    html(StatusCode::OK, register_page(theme, None))
}

async fn submit(form: RegisterForm, backend: &BackendClient) -> Result<Registration, RegisterError> {
    let registration = form.parse().inspect_err(|e| {
        warn!("Registration input rejected: {}", e);
    })?;
    backend.register(&registration).await?;
    Ok(registration)
}

#[instrument(skip_all)]
pub async fn register(
    form: Form<RegisterForm>,
    backend: Data<BackendClient>,
    session: Session,
    theme_state: Data<ThemeState>,
) -> Result<HttpResponse, InternalError<RegisterError>> {
    match submit(form.into_inner(), &backend).await {
        Ok(registration) => {
            info!(role = %registration.role, "Account registered");
            Ok(see_other("/login?registered=1"))
        }
        Err(e) => {
            let theme = theme_state.resolve(theme_preference(&session));
            Err(e.into_page(theme))
        }
    }
}
