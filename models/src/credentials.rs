use serde::Serialize;

use crate::{Role, UserEmail};

/// Sign-in input. Forwarded once to the backend and never stored.
#[derive(Serialize)]
pub struct Credentials {
    pub email: UserEmail,
    pub password: String,
}

/// Sign-up input, already validated.
#[derive(Serialize)]
pub struct Registration {
    pub name: String,
    pub email: UserEmail,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .finish()
    }
}
