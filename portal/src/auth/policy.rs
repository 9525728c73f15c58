//! The single authorization decision used by every protected entry point.

use chrono::{DateTime, Utc};
use models::{Role, SessionAuth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoSession,
    Expired,
    RoleMismatch { required: Role, actual: Role },
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSession => write!(f, "no session"),
            Self::Expired => write!(f, "session expired"),
            Self::RoleMismatch { required, actual } => {
                write!(f, "role {actual} cannot enter the {required} area")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Allows only a live session whose role is exactly `required`.
pub fn authorize(session: Option<&SessionAuth>, required: Role, now: DateTime<Utc>) -> Decision {
    match session {
        None => Decision::Deny(DenyReason::NoSession),
        Some(auth) if auth.is_expired(now) => Decision::Deny(DenyReason::Expired),
        Some(auth) if auth.role() != required => Decision::Deny(DenyReason::RoleMismatch {
            required,
            actual: auth.role(),
        }),
        Some(_) => Decision::Allow,
    }
}

/// Per-request gate. Starts `Unchecked`; `check` moves it to one of the two
/// terminal states and is a no-op afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Unchecked,
    Authorized(SessionAuth),
    Denied(DenyReason),
}

impl GateState {
    pub fn check(self, session: Option<SessionAuth>, required: Role, now: DateTime<Utc>) -> GateState {
        match self {
            GateState::Unchecked => match authorize(session.as_ref(), required, now) {
                Decision::Allow => match session {
                    Some(auth) => GateState::Authorized(auth),
                    None => GateState::Denied(DenyReason::NoSession),
                },
                Decision::Deny(reason) => GateState::Denied(reason),
            },
            terminal => terminal,
        }
    }
}
