use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthUser, Role};

/// Session key under which [`SessionAuth`] is stored.
pub const SESSION_AUTH_KEY: &str = "auth";

/// Proof of authentication kept by the session provider.
///
/// Fields are private: once issued, the identity and role of a session cannot
/// change. A different role needs a fresh sign-in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionAuth {
    user_id: String,
    email: String,
    name: String,
    role: Role,
    expires_at: DateTime<Utc>,
    token: Option<String>,
}

impl SessionAuth {
    pub fn issue(user: AuthUser, token: Option<String>, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            expires_at: now + ttl,
            token,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Name shown in page headers; falls back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
