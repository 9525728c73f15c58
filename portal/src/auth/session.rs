//! Reads and writes the portal's entries in the actix session.

use actix_session::{Session, SessionInsertError};
use chrono::{DateTime, Duration, Utc};
use models::{SESSION_AUTH_KEY, SESSION_THEME_KEY, SessionAuth, Theme};
use tracing::warn;

/// Lifetime of a newly issued session.
#[derive(Clone, Copy, Debug)]
pub struct SessionTtl(pub Duration);

/// The stored session, if any. Unreadable entries count as no session.
pub fn current_auth(session: &Session) -> Option<SessionAuth> {
    match session.get::<SessionAuth>(SESSION_AUTH_KEY) {
        Ok(auth) => auth,
        Err(e) => {
            warn!("Discarding unreadable session: {}", e);
            None
        }
    }
}

/// The stored session if it has not expired yet.
pub fn live_auth(session: &Session, now: DateTime<Utc>) -> Option<SessionAuth> {
    current_auth(session).filter(|auth| !auth.is_expired(now))
}

/// Starts a fresh session for `auth`. The session id is rotated first so a
/// pre-login cookie never carries an authenticated identity.
pub fn establish(session: &Session, auth: &SessionAuth) -> Result<(), SessionInsertError> {
    session.renew();
    session.insert(SESSION_AUTH_KEY, auth)
}

pub fn sign_out(session: &Session) {
    session.purge();
}

/// Drops the signed-in identity but keeps the visitor's other entries,
/// such as the theme preference. The session id is rotated as well.
pub fn forget_auth(session: &Session) {
    session.remove(SESSION_AUTH_KEY);
    session.renew();
}

pub fn theme_preference(session: &Session) -> Option<Theme> {
    session.get::<Theme>(SESSION_THEME_KEY).ok().flatten()
}

pub fn set_theme_preference(session: &Session, theme: Theme) -> Result<(), SessionInsertError> {
    session.insert(SESSION_THEME_KEY, theme)
}
