pub mod config;
pub mod credentials;
pub mod email;
pub mod resource;
pub mod role;
pub mod session;
pub mod theme;
pub mod user;

pub use config::*;
pub use credentials::{Credentials, Registration};
pub use email::UserEmail;
pub use resource::{Assignment, Course, Event, ResourceKind, Submission};
pub use role::Role;
pub use session::{SESSION_AUTH_KEY, SessionAuth};
pub use theme::{SESSION_THEME_KEY, Theme};
pub use user::{AuthResponse, AuthUser, BackendMessage};
