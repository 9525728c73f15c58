pub mod auth;
pub mod backend;
pub mod error;
pub mod render;
pub mod routes;
pub mod settings;
pub mod shell;
pub mod startup;
pub mod telemetry;
pub mod theme;
pub use settings::*;
pub use startup::*;
